use criterion::{Criterion, criterion_group, criterion_main};
use naivre::{DeterministicFiniteAutomaton, RegexCompiler};

fn compile_and_simulate(c: &mut Criterion) {
    c.bench_function("compile_union_closure_to_dfa", |bench| {
        bench.iter(|| {
            let nfa = RegexCompiler::from_regex("(a|b)*(c)+").compile().unwrap();
            DeterministicFiniteAutomaton::from_nfa(&nfa)
        });
    });

    c.bench_function("simulate_dfa_long_input", |bench| {
        let nfa = RegexCompiler::from_regex("(a|b)*(c)+").compile().unwrap();
        let dfa = DeterministicFiniteAutomaton::from_nfa(&nfa);
        let input = "ab".repeat(512) + "c";
        bench.iter(|| dfa.accepts(&input));
    });

    c.bench_function("simulate_nfa_long_input", |bench| {
        let nfa = RegexCompiler::from_regex("(a|b)*(c)+").compile().unwrap();
        let input = "ab".repeat(512) + "c";
        bench.iter(|| nfa.accepts(&input));
    });
}

criterion_group!(benches, compile_and_simulate);
criterion_main!(benches);
