//! The `Reducer` trait — core abstraction for business logic.
//!
//! Reducers are pure functions: `(State, Action, Environment) → Effects`.
//! They contain all business logic, mutate state in place, and return
//! descriptions of the side effects the runtime should execute. Because they
//! perform no I/O themselves, they are deterministic and testable at memory
//! speed.

use crate::effect::Effect;
use smallvec::SmallVec;

/// The number of effects a reducer can return without heap allocation.
///
/// Most actions produce zero to three effects (persist, publish, resolve);
/// four covers the common cases inline.
pub const INLINE_EFFECTS: usize = 4;

/// Core abstraction for business logic.
///
/// # Type Parameters
///
/// - `State`: the domain state this reducer operates on
/// - `Action`: the action type this reducer processes
/// - `Environment`: the injected dependencies this reducer needs
///
/// # Example
///
/// ```ignore
/// impl Reducer for DispatchReducer {
///     type State = DispatchState;
///     type Action = DispatchAction;
///     type Environment = DispatchEnvironment;
///
///     fn reduce(
///         &self,
///         state: &mut DispatchState,
///         action: DispatchAction,
///         env: &DispatchEnvironment,
///     ) -> SmallVec<[Effect<DispatchAction>; 4]> {
///         match action {
///             DispatchAction::CallNext { scope, .. } => {
///                 // mutate state, describe effects
///                 smallvec![Effect::None]
///             }
///             _ => smallvec![Effect::None],
///         }
///     }
/// }
/// ```
pub trait Reducer {
    /// The state type this reducer operates on.
    type State;

    /// The action type this reducer processes.
    type Action;

    /// The environment type with injected dependencies.
    type Environment;

    /// Reduce an action into state changes and effects.
    ///
    /// This is a pure function that:
    /// 1. Validates the action against current state
    /// 2. Updates state in place
    /// 3. Returns effect descriptions to be executed by the runtime
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; INLINE_EFFECTS]>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[derive(Debug, Default, PartialEq)]
    struct CounterState {
        value: i64,
    }

    #[derive(Debug, Clone)]
    enum CounterAction {
        Add(i64),
        Reset,
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            (): &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; INLINE_EFFECTS]> {
            match action {
                CounterAction::Add(n) => {
                    state.value += n;
                    smallvec![Effect::None]
                }
                CounterAction::Reset => {
                    state.value = 0;
                    SmallVec::new()
                }
            }
        }
    }

    #[test]
    fn reduce_mutates_state_in_place() {
        let reducer = CounterReducer;
        let mut state = CounterState::default();

        reducer.reduce(&mut state, CounterAction::Add(3), &());
        reducer.reduce(&mut state, CounterAction::Add(4), &());

        assert_eq!(state.value, 7);
    }

    #[test]
    fn reduce_returns_effect_descriptions() {
        let reducer = CounterReducer;
        let mut state = CounterState::default();

        let effects = reducer.reduce(&mut state, CounterAction::Add(1), &());
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], Effect::None));

        let effects = reducer.reduce(&mut state, CounterAction::Reset, &());
        assert!(effects.is_empty());
        assert_eq!(state.value, 0);
    }
}
