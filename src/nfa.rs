use std::collections::BTreeSet;
use std::fmt;

/// Represents a nondeterministic finite automaton (NFA) over single
/// characters, with ε-transitions.
///
/// States live in a flat arena owned by the automaton; transitions
/// address their targets by arena index, so the cyclic graphs produced
/// by `*` and `+` need no shared ownership. The automaton always has a
/// single start state and a single accept state. Every combinator
/// keeps the invariant that the accept state of a freshly built
/// automaton has no outgoing transitions; it only gains ε-transitions
/// when the automaton is absorbed into a larger one, at which point it
/// stops being the accept state.
#[derive(Debug, Clone)]
pub struct NondeterministicFiniteAutomaton {
    start: StateHandle,
    accept: StateHandle,
    states: Vec<State>,
}

impl NondeterministicFiniteAutomaton {
    /// Creates a new NFA with fresh start and accept states and no
    /// transitions.
    fn new() -> Self {
        let states = vec![
            State::new(), // Start state
            State::new(), // Accept state
        ];

        Self {
            start: StateHandle::new(0),
            accept: StateHandle::new(1),
            states,
        }
    }

    /// Creates an NFA that matches exactly one character.
    pub fn from_char(c: char) -> Self {
        let mut nfa = Self::new();
        nfa.add_char_transition(nfa.start, nfa.accept, c);
        nfa
    }

    /// Returns the start state handle.
    pub fn start(&self) -> StateHandle {
        self.start
    }

    /// Returns the accept state handle.
    pub fn accept(&self) -> StateHandle {
        self.accept
    }

    /// Adds a new intermediate state to the NFA.
    fn add_intermediate_state(&mut self) -> StateHandle {
        let index = self.states.len();
        self.states.push(State::new());
        StateHandle::new(index)
    }

    /// Adds a transition labelled with a concrete character.
    pub fn add_char_transition(&mut self, from: StateHandle, to: StateHandle, symbol: char) {
        self.states[from.index()].add_char_transition(symbol, to);
    }

    /// Adds an ε-transition (followed without consuming input).
    pub fn add_epsilon_transition(&mut self, from: StateHandle, to: StateHandle) {
        self.states[from.index()].add_epsilon_transition(to);
    }

    /// Gets a reference to a state by its handle.
    pub fn state(&self, handle: StateHandle) -> &State {
        &self.states[handle.index()]
    }

    /// Returns the number of states in the NFA.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Offsets all state indices by the given amount.
    /// Used internally when combining NFAs.
    fn offset_states(&mut self, index_offset: usize) {
        for state in &mut self.states {
            state.offset_transitions(index_offset);
        }
        self.start = self.start.offset(index_offset);
        self.accept = self.accept.offset(index_offset);
    }

    /// Merges `other`'s arena into this one and returns `other`'s
    /// start and accept handles rebased into the merged arena.
    fn absorb(&mut self, mut other: Self) -> (StateHandle, StateHandle) {
        let index_offset = self.states.len();
        other.offset_states(index_offset);
        self.states.extend(other.states);
        (other.start, other.accept)
    }

    /// Concatenates this NFA with another.
    ///
    /// The old accept state is joined to `other`'s start by an
    /// ε-transition; the outer terminals are reused, so no new states
    /// are allocated.
    pub fn concat(mut self, other: Self) -> Self {
        let (other_start, other_accept) = self.absorb(other);
        self.add_epsilon_transition(self.accept, other_start);
        self.accept = other_accept;
        self
    }

    /// Creates the union of this NFA with another.
    /// The resulting NFA matches either pattern.
    pub fn union(mut self, other: Self) -> Self {
        let (other_start, other_accept) = self.absorb(other);
        let new_start = self.add_intermediate_state();
        let new_accept = self.add_intermediate_state();

        self.add_epsilon_transition(new_start, self.start);
        self.add_epsilon_transition(new_start, other_start);
        self.add_epsilon_transition(self.accept, new_accept);
        self.add_epsilon_transition(other_accept, new_accept);

        self.start = new_start;
        self.accept = new_accept;
        self
    }

    /// Applies the Kleene closure (*) operator to this NFA.
    /// The resulting NFA matches zero or more repetitions of the
    /// original pattern.
    pub fn closure(mut self) -> Self {
        let new_start = self.add_intermediate_state();
        let new_accept = self.add_intermediate_state();

        // Epsilon from new start to old start
        self.add_epsilon_transition(new_start, self.start);
        // Epsilon from new start to new accept (for zero matches)
        self.add_epsilon_transition(new_start, new_accept);
        // Epsilon from old accept back to old start (for repetition)
        self.add_epsilon_transition(self.accept, self.start);
        // Epsilon from old accept to new accept
        self.add_epsilon_transition(self.accept, new_accept);

        self.start = new_start;
        self.accept = new_accept;
        self
    }

    /// Applies the positive closure (+) operator to this NFA.
    /// The resulting NFA matches one or more repetitions: there is no
    /// skip edge from the new start, so one traversal is forced.
    pub fn positive_closure(mut self) -> Self {
        let new_start = self.add_intermediate_state();
        let new_accept = self.add_intermediate_state();

        self.add_epsilon_transition(new_start, self.start);
        self.add_epsilon_transition(self.accept, self.start);
        self.add_epsilon_transition(self.accept, new_accept);

        self.start = new_start;
        self.accept = new_accept;
        self
    }

    /// Makes this NFA optional (? operator).
    /// The resulting NFA matches zero or one occurrence of the pattern.
    pub fn optional(mut self) -> Self {
        let new_start = self.add_intermediate_state();
        let new_accept = self.add_intermediate_state();

        // Epsilon from new start to old start (for matching)
        self.add_epsilon_transition(new_start, self.start);
        // Epsilon from new start to new accept (for skipping)
        self.add_epsilon_transition(new_start, new_accept);
        // Epsilon from old accept to new accept
        self.add_epsilon_transition(self.accept, new_accept);

        self.start = new_start;
        self.accept = new_accept;
        self
    }

    /// Computes the ε-closure of a set of states: the smallest superset
    /// closed under ε-transitions. Each state is visited at most once;
    /// insertion order does not affect the result.
    pub fn epsilon_closure<I>(&self, states: I) -> BTreeSet<StateHandle>
    where
        I: IntoIterator<Item = StateHandle>,
    {
        let mut closure = BTreeSet::new();
        let mut stack: Vec<StateHandle> = states.into_iter().collect();
        while let Some(current) = stack.pop() {
            if closure.insert(current) {
                for next_state in self.state(current).epsilon_targets() {
                    stack.push(next_state);
                }
            }
        }
        closure
    }

    /// The states reachable from `states` on exactly one transition
    /// labelled `symbol`. ε-transitions are not followed here.
    pub fn move_on<I>(&self, states: I, symbol: char) -> BTreeSet<StateHandle>
    where
        I: IntoIterator<Item = StateHandle>,
    {
        let mut reached = BTreeSet::new();
        for state in states {
            reached.extend(self.state(state).targets_on(symbol));
        }
        reached
    }

    /// All concrete symbols appearing on any transition.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.states
            .iter()
            .flat_map(|state| state.char_transitions.iter().map(|t| t.symbol))
            .collect()
    }

    /// Runs the multi-state closure simulation; true iff `input` is in
    /// the automaton's language.
    ///
    /// The ε-closure is applied both to the initial state set and after
    /// every move; acceptance paths may end on ε-edges. An empty state
    /// set before the input is exhausted rejects immediately.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.epsilon_closure([self.start]);
        for symbol in input.chars() {
            let next = self.epsilon_closure(self.move_on(current, symbol));
            if next.is_empty() {
                return false;
            }
            current = next;
        }
        current.contains(&self.accept)
    }
}

impl fmt::Display for NondeterministicFiniteAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "NFA with {} states, start {}, accept {}:",
            self.states.len(),
            self.start.index(),
            self.accept.index()
        )?;
        for (index, state) in self.states.iter().enumerate() {
            write!(f, "  {}", index)?;
            if index == self.accept.index() {
                write!(f, "*")?;
            }
            write!(f, ":")?;
            for transition in &state.char_transitions {
                write!(f, " -{}-> {}", transition.symbol, transition.target.index())?;
            }
            for target in &state.epsilon_transitions {
                write!(f, " -ε-> {}", target.index())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Index of a state within its owning automaton's arena. Handles are
/// only meaningful for the automaton that issued them.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct StateHandle(usize);

impl StateHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the index of this state.
    pub fn index(&self) -> usize {
        self.0
    }

    pub fn offset(&self, offset: usize) -> Self {
        Self(self.0 + offset)
    }
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub char_transitions: BTreeSet<LabelledTransition>,
    pub epsilon_transitions: BTreeSet<StateHandle>,
}

impl State {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self {
            char_transitions: BTreeSet::new(),
            epsilon_transitions: BTreeSet::new(),
        }
    }

    /// Adds a character transition to this state.
    pub fn add_char_transition(&mut self, symbol: char, target: StateHandle) {
        self.char_transitions
            .insert(LabelledTransition { symbol, target });
    }

    /// Adds an ε-transition to this state.
    pub fn add_epsilon_transition(&mut self, target: StateHandle) {
        self.epsilon_transitions.insert(target);
    }

    /// Returns true if this state has no outgoing transitions.
    pub fn is_dead_end(&self) -> bool {
        self.char_transitions.is_empty() && self.epsilon_transitions.is_empty()
    }

    /// Targets reachable from this state on the given character.
    pub fn targets_on(&self, symbol: char) -> impl Iterator<Item = StateHandle> + '_ {
        self.char_transitions
            .iter()
            .filter(move |transition| transition.symbol == symbol)
            .map(|transition| transition.target)
    }

    /// Gets all ε-transition targets.
    pub fn epsilon_targets(&self) -> impl Iterator<Item = StateHandle> + '_ {
        self.epsilon_transitions.iter().copied()
    }

    fn offset_transitions(&mut self, offset: usize) {
        self.char_transitions = self
            .char_transitions
            .iter()
            .map(|t| LabelledTransition {
                symbol: t.symbol,
                target: t.target.offset(offset),
            })
            .collect();
        self.epsilon_transitions = self
            .epsilon_transitions
            .iter()
            .map(|h| h.offset(offset))
            .collect();
    }
}

/// An outgoing edge labelled with a concrete character. ε-edges are
/// stored separately on the state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct LabelledTransition {
    pub symbol: char,
    pub target: StateHandle,
}
