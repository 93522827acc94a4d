// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use fleet_model::model::ModelError;

/// The two phases of the assignment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Finding the minimum number of cars.
    Feasibility,
    /// Balancing the car durations at that number of cars.
    Balancing,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Feasibility => write!(f, "feasibility"),
            Phase::Balancing => write!(f, "balancing"),
        }
    }
}

/// The ways the pipeline can fail to produce an assignment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    /// The rides were rejected before any solving began.
    #[error("invalid task: {0}")]
    InvalidTask(String),
    /// A phase ran out of time before it found any assignment.
    #[error("the {phase} phase ran out of time without finding a solution")]
    SearchTimeoutNoSolution { phase: Phase },
}

impl<T> From<ModelError<T>> for AssignError
where
    T: std::fmt::Display,
{
    fn from(err: ModelError<T>) -> Self {
        AssignError::InvalidTask(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_errors_become_invalid_task() {
        let err: AssignError = ModelError::InvalidRide {
            index: 0,
            start: 10i64,
            end: 5,
        }
        .into();
        assert_eq!(
            err,
            AssignError::InvalidTask(
                "ride 0 is invalid: start 10 is not before end 5".to_string()
            )
        );
        assert_eq!(
            AssignError::from(ModelError::<i64>::EmptyRideSet).to_string(),
            "invalid task: the ride set is empty"
        );
    }

    #[test]
    fn test_timeout_message_names_the_phase() {
        let err = AssignError::SearchTimeoutNoSolution {
            phase: Phase::Balancing,
        };
        assert_eq!(
            err.to_string(),
            "the balancing phase ran out of time without finding a solution"
        );
    }
}
