use naivre::{DeterministicFiniteAutomaton, NondeterministicFiniteAutomaton, RegexCompiler};

fn compile(pattern: &str) -> NondeterministicFiniteAutomaton {
    RegexCompiler::from_regex(pattern)
        .compile()
        .unwrap_or_else(|e| panic!("{:?} should compile: {}", pattern, e))
}

fn check(pattern: &str, input: &str, expected: bool) {
    let nfa = compile(pattern);
    let dfa = DeterministicFiniteAutomaton::from_nfa(&nfa);
    assert_eq!(
        nfa.accepts(input),
        expected,
        "NFA for {:?} on {:?}",
        pattern,
        input
    );
    assert_eq!(
        dfa.accepts(input),
        expected,
        "DFA for {:?} on {:?}",
        pattern,
        input
    );
}

#[test]
fn union_closure_plus_scenarios() {
    check("(a|b)*(c)+", "ababababac", true);
    check("(a|b)*(c)+", "abc", true);
    check("(a|b)*(c)+", "ab", false);
    check("(a|b)*(c)+", "ccc", true);
    check("(a|b)*(c)+", "", false);
}

#[test]
fn nested_closure_scenarios() {
    check("(a*)*", "aaaa", true);
    check("(a*)*", "", true);
    check("(a*)*", "b", false);
}

#[test]
fn optional_scenarios() {
    check("a?b", "b", true);
    check("a?b", "ab", true);
    check("a?b", "aab", false);
}

/// Every string over the pattern's alphabet, up to the given length.
fn strings_up_to(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &frontier {
            for &c in alphabet {
                let mut extended = prefix.clone();
                extended.push(c);
                next.push(extended);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

#[test]
fn nfa_and_dfa_recognize_the_same_language() {
    let patterns = [
        "(a|b)*(c)+",
        "(a*)*",
        "a?b",
        "a(b|c)*a",
        "(ab)+",
        "a|b|c",
        "((a|b)?c)*",
    ];
    for pattern in patterns {
        let nfa = compile(pattern);
        let dfa = DeterministicFiniteAutomaton::from_nfa(&nfa);
        let alphabet: Vec<char> = nfa.alphabet().into_iter().collect();
        for input in strings_up_to(&alphabet, 4) {
            assert_eq!(
                nfa.accepts(&input),
                dfa.accepts(&input),
                "{:?} disagrees on {:?}",
                pattern,
                input
            );
        }
    }
}

#[test]
fn inputs_outside_the_alphabet_are_rejected_not_errors() {
    let nfa = compile("(a|b)*");
    let dfa = DeterministicFiniteAutomaton::from_nfa(&nfa);
    assert!(!nfa.accepts("abz"));
    assert!(!dfa.accepts("abz"));
    assert!(!dfa.accepts("z"));
}

#[test]
fn explicit_concatenation_operator_is_accepted_in_patterns() {
    check("a·b", "ab", true);
    check("a·b", "a", false);
}
