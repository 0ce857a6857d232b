//! Property tests for alias resolution.
//!
//! - Acyclic chains always resolve to a node without an alias
//! - Any injected back edge is reported as a cycle and fails resolution
//! - Impact traversal terminates and never reports a changed token

use proptest::prelude::*;
use tokenweave_core::{Color, Token, TokenDocument, TokenKind, TokenPath, TokenValue};
use tokenweave_resolver::{DependencyMap, ResolveError, TokenGraph};

fn name(i: usize) -> String {
    format!("Chain/t{}", i)
}

/// A chain `t0 -> t1 -> ... -> t{len-1}` where the last token is concrete.
fn chain(len: usize) -> TokenDocument {
    let mut doc = TokenDocument::empty("chain");
    for i in 0..len {
        let token = if i + 1 == len {
            Token::concrete(TokenValue::Color(Color::rgb(i as u8, 0, 0)))
        } else {
            Token::alias(TokenKind::Color, TokenPath::from_canonical(&name(i + 1)), None)
        };
        doc.insert(&TokenPath::from_canonical(&name(i)), token);
    }
    doc
}

proptest! {
    #[test]
    fn prop_acyclic_chain_resolves(len in 1usize..40, start in 0usize..40) {
        let start = start % len;
        let doc = chain(len);
        let graph = TokenGraph::build(&[&doc]);

        prop_assert!(graph.detect_cycles().is_empty());
        let resolved = graph.resolve(&name(start)).unwrap();
        prop_assert_eq!(resolved.path.canonical(), name(len - 1));
        prop_assert!(graph.node(&resolved.path.canonical()).unwrap().alias_target.is_none());
        prop_assert_eq!(resolved.chain.len(), len - start);
    }

    #[test]
    fn prop_back_edge_is_a_cycle(len in 2usize..40, back in 0usize..40) {
        let back = back % (len - 1);
        let mut doc = chain(len);
        // Turn the terminal into an alias pointing back into the chain.
        doc.insert(
            &TokenPath::from_canonical(&name(len - 1)),
            Token::alias(TokenKind::Color, TokenPath::from_canonical(&name(back)), None),
        );
        let graph = TokenGraph::build(&[&doc]);

        let cycles = graph.detect_cycles();
        prop_assert_eq!(cycles.len(), 1);
        prop_assert!(cycles[0].contains(&name(back)));
        prop_assert!(cycles[0].contains(&name(len - 1)));
        prop_assert_eq!(cycles[0].first(), cycles[0].last());

        let is_circular = matches!(graph.resolve(&name(0)), Err(ResolveError::CircularAlias { .. }));
        prop_assert!(is_circular);
    }

    #[test]
    fn prop_impact_never_reports_changed(len in 1usize..30, changed in 0usize..30) {
        let changed = name(changed % len);
        let doc = chain(len);
        let report = DependencyMap::build(&[&doc]).impact(&[changed.as_str()]);
        prop_assert!(!report.contains(&changed));
        for token in &report.affected {
            prop_assert!(token.depth >= 1);
        }
    }
}
