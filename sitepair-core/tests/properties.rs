//! Property-based tests for the pairing invariants.
//!
//! These verify the pairing contract for ANY interleaving and ANY
//! push/pop sequence, not just crafted examples. proptest generates and
//! shrinks the inputs.

mod common;

use std::collections::VecDeque;

use common::VecSink;
use proptest::prelude::*;
use sitepair_core::{BlockState, CapacityPolicy, Scalar, ValueQueue, ValueSlot};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// =============================================================================
// Property: pairing is positional, independent of interleaving
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// For any interleaving of N first-kind and N second-kind pushes into
    /// a fresh block, the emitted pairs are (v1_i, v2_i) in index order.
    #[test]
    fn pairs_match_by_position(order in prop::collection::vec(any::<bool>(), 0..64)) {
        let mut state = BlockState::new(CapacityPolicy::Growable);
        let mut sink = VecSink::new();
        let mut firsts = 0i64;
        let mut seconds = 0i64;
        for take_first in &order {
            if *take_first {
                firsts += 1;
                state.push(ValueSlot::First, Scalar::Float(firsts as f64)).unwrap();
            } else {
                seconds += 1;
                state.push(ValueSlot::Second, Scalar::Integer(seconds)).unwrap();
            }
            state.flush_pairs(&mut sink).unwrap();
        }
        let expected: Vec<_> = (1..=firsts.min(seconds))
            .map(|i| (i as u32, "(unknown_site)".to_owned(), Scalar::Float(i as f64), Scalar::Integer(i)))
            .collect();
        prop_assert_eq!(sink.records(), expected);
    }

    /// Flushing after every push or once at the end yields the same pairs.
    #[test]
    fn eager_and_deferred_flush_agree(order in prop::collection::vec(any::<bool>(), 0..64)) {
        let mut eager_state = BlockState::new(CapacityPolicy::Growable);
        let mut deferred_state = BlockState::new(CapacityPolicy::Growable);
        let mut eager = VecSink::new();
        let mut deferred = VecSink::new();
        let mut n = 0i64;
        for take_first in &order {
            n += 1;
            let (slot, value) = if *take_first {
                (ValueSlot::First, Scalar::Float(n as f64))
            } else {
                (ValueSlot::Second, Scalar::Integer(n))
            };
            eager_state.push(slot, value).unwrap();
            eager_state.flush_pairs(&mut eager).unwrap();
            deferred_state.push(slot, value).unwrap();
        }
        deferred_state.flush_pairs(&mut deferred).unwrap();
        prop_assert_eq!(eager.records(), deferred.records());
    }
}

// =============================================================================
// Property: queues behave like a model deque
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Push(i64),
    Pop,
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i64>().prop_map(Op::Push),
        4 => Just(Op::Pop),
        1 => Just(Op::Reset),
    ]
}

proptest! {
    #![proptest_config(config())]

    /// A growable queue is observationally a VecDeque.
    #[test]
    fn growable_matches_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut queue = ValueQueue::growable();
        let mut model: VecDeque<i64> = VecDeque::new();
        for op in ops {
            match op {
                Op::Push(v) => {
                    queue.push_back(v).unwrap();
                    model.push_back(v);
                }
                Op::Pop => prop_assert_eq!(queue.pop_front(), model.pop_front()),
                Op::Reset => {
                    queue.reset();
                    model.clear();
                }
            }
            prop_assert_eq!(queue.len(), model.len());
            prop_assert_eq!(queue.is_empty(), model.is_empty());
        }
    }

    /// A bounded queue is a VecDeque that rejects pushes past its limit,
    /// without mutating on rejection.
    #[test]
    fn bounded_matches_capped_model(
        limit in 0usize..16,
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut queue = ValueQueue::bounded(limit);
        let mut model: VecDeque<i64> = VecDeque::new();
        for op in ops {
            match op {
                Op::Push(v) => {
                    let pushed = queue.push_back(v).is_ok();
                    prop_assert_eq!(pushed, model.len() < limit);
                    if pushed {
                        model.push_back(v);
                    }
                }
                Op::Pop => prop_assert_eq!(queue.pop_front(), model.pop_front()),
                Op::Reset => {
                    queue.reset();
                    model.clear();
                }
            }
            prop_assert_eq!(queue.len(), model.len());
        }
    }
}

// =============================================================================
// Property: the decoder never panics
// =============================================================================

proptest! {
    #![proptest_config(config())]

    #[test]
    fn decoders_never_panic(text in "\\PC{0,64}") {
        let _ = sitepair_core::scalar::decode_integer(&text);
        let _ = sitepair_core::scalar::decode_float(&text);
    }

    /// Round numbers survive the decode path exactly.
    #[test]
    fn integer_decode_roundtrips(v in any::<i64>()) {
        prop_assert_eq!(sitepair_core::scalar::decode_integer(&v.to_string()), Some(v));
    }
}
