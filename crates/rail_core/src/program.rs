//! Order-list editing. Pure operations on a program; cursor adjustment for
//! running trains lives with the commands that call these.

use crate::{Order, ProgramEditError};

pub fn append_order(program: &mut Vec<Order>, order: Order) {
    program.push(order);
}

pub fn remove_order(program: &mut Vec<Order>, index: usize) -> Result<Order, ProgramEditError> {
    check_index(program, index)?;
    Ok(program.remove(index))
}

/// Moves the order at `from` so that it ends up at index `to`.
pub fn move_order(program: &mut [Order], from: usize, to: usize) -> Result<(), ProgramEditError> {
    check_index(program, from)?;
    check_index(program, to)?;
    if from < to {
        program[from..=to].rotate_left(1);
    } else {
        program[to..=from].rotate_right(1);
    }
    Ok(())
}

fn check_index(program: &[Order], index: usize) -> Result<(), ProgramEditError> {
    if index < program.len() {
        Ok(())
    } else {
        Err(ProgramEditError::IndexOutOfRange {
            index,
            len: program.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, SpotId};

    fn wait(seconds: f64) -> Order {
        Order::WaitSeconds { seconds }
    }

    fn sample() -> Vec<Order> {
        vec![
            Order::MoveTo {
                spot: SpotId::Platform,
                target: crate::CarTarget::TrainHead,
            },
            wait(30.0),
            Order::SetReverser {
                direction: Direction::Reverse,
            },
        ]
    }

    #[test]
    fn append_pushes_to_end() {
        let mut program = sample();
        append_order(&mut program, Order::Couple);
        assert_eq!(program.len(), 4);
        assert_eq!(program[3], Order::Couple);
    }

    #[test]
    fn remove_returns_the_order() {
        let mut program = sample();
        let removed = remove_order(&mut program, 1).unwrap();
        assert_eq!(removed, wait(30.0));
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn remove_out_of_range_is_rejected() {
        let mut program = sample();
        assert_eq!(
            remove_order(&mut program, 3),
            Err(ProgramEditError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(program, sample());
    }

    #[test]
    fn move_forward_and_back() {
        let mut program = sample();
        move_order(&mut program, 0, 2).unwrap();
        assert_eq!(program[2], sample()[0]);
        assert_eq!(program[0], wait(30.0));

        move_order(&mut program, 2, 0).unwrap();
        assert_eq!(program, sample());
    }

    #[test]
    fn move_out_of_range_leaves_program() {
        let mut program = sample();
        assert!(move_order(&mut program, 0, 5).is_err());
        assert_eq!(program, sample());
    }
}
