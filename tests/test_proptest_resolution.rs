//! Property tests for cached module resolution.
//!
//! Generates small projects (a handful of module names, some declared more
//! than once) and checks that cached results always agree with a direct
//! index lookup, both before and after edits.
#![cfg(feature = "proptest")]

use modref::hir::{ModuleFinder, SearchScope, SourceKind};
use modref::ide::AnalysisHost;
use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

fn module_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c.d", "c.e", "f.g.h"]).prop_map(str::to_owned)
}

/// Declared module names, one per file, plus the names `app` requires.
fn project() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    (
        prop::collection::vec(module_name(), 0..6),
        prop::collection::vec(module_name(), 1..5),
    )
}

fn build(declared: &[String], required: &[String]) -> AnalysisHost {
    let mut host = AnalysisHost::new();
    let root = host.add_root(SourceKind::Source);
    for (i, name) in declared.iter().enumerate() {
        host.set_file_content(root, format!("/m{i}"), format!("module {name} {{}}"));
    }
    let requires: String = required
        .iter()
        .map(|name| format!("requires {name}; "))
        .collect();
    host.set_file_content(root, "/app", format!("module app {{ {requires}}}"));
    host
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn cached_resolution_matches_index((declared, required) in project()) {
        let host = build(&declared, &required);
        let cancel = CancellationToken::new();
        let resolver = host.resolver(&cancel);
        let app = host.file_id("/app").unwrap();

        for _ in 0..2 {
            for reference in host.module_references(app) {
                let cached = reference.multi_resolve(&resolver, false).unwrap();
                let direct = host
                    .module_index()
                    .find_modules(&reference.text, &SearchScope::Project, &cancel)
                    .unwrap();
                prop_assert_eq!(&cached[..], &direct[..]);

                let expected = declared.iter().filter(|n| **n == reference.text).count();
                prop_assert_eq!(cached.len(), expected);
                prop_assert_eq!(
                    reference.resolve(&resolver, false).unwrap().is_some(),
                    expected == 1
                );
            }
        }

        let references = host.module_references(app).len() as u64;
        prop_assert_eq!(host.cache_stats().misses, references);
    }

    #[test]
    fn edits_never_leave_stale_results(
        (declared, required) in project(),
        replacement in module_name(),
        target in 0usize..6,
    ) {
        let mut host = build(&declared, &required);
        let cancel = CancellationToken::new();
        let app = host.file_id("/app").unwrap();

        {
            let resolver = host.resolver(&cancel);
            for reference in host.module_references(app) {
                reference.multi_resolve(&resolver, false).unwrap();
            }
        }

        let mut declared = declared;
        if let Some(slot) = declared.get_mut(target) {
            *slot = replacement;
            let root = host.roots().root_of(app).unwrap();
            let text = format!("module {} {{}}", declared[target]);
            host.set_file_content(root, format!("/m{target}"), text);
        }

        let resolver = host.resolver(&cancel);
        for reference in host.module_references(app) {
            let expected = declared.iter().filter(|n| **n == reference.text).count();
            prop_assert_eq!(reference.multi_resolve(&resolver, false).unwrap().len(), expected);
        }
    }
}
