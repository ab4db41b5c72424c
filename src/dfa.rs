use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use log::{debug, trace};

use crate::nfa::{NondeterministicFiniteAutomaton, StateHandle};

/// The set of NFA states a DFA state stands for.
///
/// Subset identity is mathematical set equality, so the ordered
/// representation doubles as the canonical lookup key: two DFA states
/// are the same automaton state iff their sets compare equal.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct NFAStateSet {
    states: BTreeSet<StateHandle>,
}

impl NFAStateSet {
    fn new(states: BTreeSet<StateHandle>) -> Self {
        Self { states }
    }

    pub fn states(&self) -> impl Iterator<Item = StateHandle> + '_ {
        self.states.iter().copied()
    }

    pub fn contains(&self, handle: StateHandle) -> bool {
        self.states.contains(&handle)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl fmt::Display for NFAStateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, handle) in self.states.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", handle.index())?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct DFAStateHandle(usize);

impl DFAStateHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// A determinized state: the subset of NFA states it represents, its
/// transition map, and whether the subset contains the NFA accept
/// state. At most one transition exists per symbol; a missing entry is
/// the implicit dead state.
#[derive(Debug, Clone)]
pub struct DFAState {
    nfa_states: Rc<NFAStateSet>,
    transitions: BTreeMap<char, DFAStateHandle>,
    is_accept: bool,
}

impl DFAState {
    fn new(subset: Rc<NFAStateSet>, is_accept: bool) -> Self {
        Self {
            nfa_states: subset,
            transitions: BTreeMap::new(),
            is_accept,
        }
    }

    pub fn subset(&self) -> &NFAStateSet {
        &self.nfa_states
    }

    pub fn is_accept(&self) -> bool {
        self.is_accept
    }

    pub fn next_state(&self, input: char) -> Option<DFAStateHandle> {
        self.transitions.get(&input).copied()
    }

    pub fn transitions(&self) -> impl Iterator<Item = (char, DFAStateHandle)> + '_ {
        self.transitions
            .iter()
            .map(|(&symbol, &target)| (symbol, target))
    }

    fn add_transition(&mut self, symbol: char, target: DFAStateHandle) {
        self.transitions.insert(symbol, target);
    }
}

/// A deterministic finite automaton produced by subset construction.
///
/// States are kept in discovery order with the start state first. The
/// alphabet is derived from the underlying subsets: the union of all
/// concrete symbols leaving any NFA state contained in any subset.
#[derive(Debug, Clone)]
pub struct DeterministicFiniteAutomaton {
    dfa_states: Vec<DFAState>,
    start_state: DFAStateHandle,
    alphabet: BTreeSet<char>,
}

impl DeterministicFiniteAutomaton {
    /// Determinizes `nfa` over its own derived alphabet.
    pub fn from_nfa(nfa: &NondeterministicFiniteAutomaton) -> Self {
        Self::from_nfa_with_alphabet(nfa, nfa.alphabet())
    }

    /// Determinizes `nfa` over an explicit alphabet.
    ///
    /// Symbols are processed in ascending character order, which fixes
    /// state discovery order and therefore state numbering; tests may
    /// compare handles across runs.
    pub fn from_nfa_with_alphabet(
        nfa: &NondeterministicFiniteAutomaton,
        alphabet: BTreeSet<char>,
    ) -> Self {
        SubsetBuilder::build(nfa, alphabet)
    }

    pub fn start_state(&self) -> DFAStateHandle {
        self.start_state
    }

    pub fn state(&self, handle: DFAStateHandle) -> &DFAState {
        &self.dfa_states[handle.index()]
    }

    pub fn state_count(&self) -> usize {
        self.dfa_states.len()
    }

    pub fn iter_states(&self) -> impl Iterator<Item = (DFAStateHandle, &DFAState)> {
        self.dfa_states
            .iter()
            .enumerate()
            .map(|(i, state)| (DFAStateHandle::new(i), state))
    }

    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn next_state(&self, current: DFAStateHandle, input: char) -> Option<DFAStateHandle> {
        self.dfa_states[current.index()].next_state(input)
    }

    /// Runs the deterministic walk; true iff `input` is accepted.
    ///
    /// A symbol with no outgoing transition rejects immediately, which
    /// also covers characters outside the alphabet.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.start_state;
        for symbol in input.chars() {
            match self.next_state(current, symbol) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.state(current).is_accept()
    }
}

impl fmt::Display for DeterministicFiniteAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DFA with {} states, alphabet {{", self.dfa_states.len())?;
        for (i, symbol) in self.alphabet.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", symbol)?;
        }
        writeln!(f, "}}, start {}:", self.start_state.index())?;
        for (handle, state) in self.iter_states() {
            write!(f, "  {}", handle.index())?;
            if state.is_accept() {
                write!(f, "*")?;
            }
            write!(f, " {}:", state.subset())?;
            for (symbol, target) in state.transitions() {
                write!(f, " -{}-> {}", symbol, target.index())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

struct SubsetBuilder<'a> {
    nfa: &'a NondeterministicFiniteAutomaton,
    dfa_states_lut: HashMap<Rc<NFAStateSet>, DFAStateHandle>,
    dfa_states: Vec<DFAState>,
    worklist: VecDeque<DFAStateHandle>,
}

impl<'a> SubsetBuilder<'a> {
    fn build(
        nfa: &'a NondeterministicFiniteAutomaton,
        alphabet: BTreeSet<char>,
    ) -> DeterministicFiniteAutomaton {
        let mut builder = Self {
            nfa,
            dfa_states_lut: HashMap::new(),
            dfa_states: Vec::new(),
            worklist: VecDeque::new(),
        };
        let start_state = builder.initialize_start_state();
        builder.process_worklist(&alphabet);
        let alphabet = builder.derived_alphabet();
        debug!(
            "subset construction: {} dfa states over {} symbols",
            builder.dfa_states.len(),
            alphabet.len()
        );
        DeterministicFiniteAutomaton {
            dfa_states: builder.dfa_states,
            start_state,
            alphabet,
        }
    }

    fn initialize_start_state(&mut self) -> DFAStateHandle {
        let start_closure = self.nfa.epsilon_closure([self.nfa.start()]);
        let subset = Rc::new(NFAStateSet::new(start_closure));
        let (start_handle, _) = self.get_or_create_state(subset);
        self.worklist.push_back(start_handle);
        start_handle
    }

    fn process_worklist(&mut self, alphabet: &BTreeSet<char>) {
        let symbols: Vec<char> = alphabet.iter().copied().collect();
        while let Some(current_handle) = self.worklist.pop_front() {
            self.expand_state(current_handle, &symbols);
        }
    }

    fn expand_state(&mut self, current_handle: DFAStateHandle, symbols: &[char]) {
        let current_subset = self.dfa_states[current_handle.index()].nfa_states.clone();
        for &symbol in symbols {
            let moved = self.nfa.move_on(current_subset.states(), symbol);
            let closure = self.nfa.epsilon_closure(moved);
            if closure.is_empty() {
                // No transition on this symbol: the implicit dead state.
                continue;
            }
            let next_subset = Rc::new(NFAStateSet::new(closure));
            let (next_handle, is_new_state) = self.get_or_create_state(next_subset);
            if is_new_state {
                self.worklist.push_back(next_handle);
            }
            trace!(
                "dfa transition {} -{}-> {}",
                current_handle.index(),
                symbol,
                next_handle.index()
            );
            self.dfa_states[current_handle.index()].add_transition(symbol, next_handle);
        }
    }

    fn get_or_create_state(&mut self, subset: Rc<NFAStateSet>) -> (DFAStateHandle, bool) {
        if let Some(handle) = self.dfa_states_lut.get(&subset) {
            (*handle, false)
        } else {
            let new_handle = DFAStateHandle::new(self.dfa_states.len());
            let is_accept = subset.contains(self.nfa.accept());
            trace!(
                "new dfa state {} = {} accept={}",
                new_handle.index(),
                subset,
                is_accept
            );
            self.dfa_states
                .push(DFAState::new(subset.clone(), is_accept));
            self.dfa_states_lut.insert(subset, new_handle);
            (new_handle, true)
        }
    }

    fn derived_alphabet(&self) -> BTreeSet<char> {
        self.dfa_states
            .iter()
            .flat_map(|state| state.subset().states())
            .flat_map(|handle| {
                self.nfa
                    .state(handle)
                    .char_transitions
                    .iter()
                    .map(|t| t.symbol)
            })
            .collect()
    }
}
