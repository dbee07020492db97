//! Property-based tests using proptest
//!
//! Leg grouping of parallel composition, dagger involution and the
//! bitstring conversions.

use ndarray::{Dimension, IxDyn};
use proptest::prelude::*;

use cqmap::quantum::{bitstring2index, index2bitstring, CQMap, Dim, CQ};

// A dimension with up to two axes of size 2 or 3
fn dim_strategy() -> impl Strategy<Value = Dim> {
    prop::collection::vec(2usize..4, 0..3).prop_map(|axes| Dim::new(axes))
}

fn cq_strategy() -> impl Strategy<Value = CQ> {
    (dim_strategy(), dim_strategy()).prop_map(|(c, q)| CQ::new(c, q))
}

fn doubled_size(cq: &CQ) -> usize {
    cq.classical.size() * cq.quantum.size() * cq.quantum.size()
}

// Keeps the arrays of the maps under test small
const MAX_ENTRIES: usize = 1 << 12;

fn small_enough(cqs: &[&CQ]) -> bool {
    cqs.iter().map(|cq| doubled_size(cq)).product::<usize>() <= MAX_ENTRIES
}

// Deterministic entries, distinct enough to expose transposed legs
fn sample_map(dom: CQ, cod: CQ, seed: usize) -> CQMap {
    let len = doubled_size(&dom) * doubled_size(&cod);
    let data: Vec<f64> = (0..len).map(|k| ((k * 7 + seed) % 13) as f64 - 6.0).collect();
    CQMap::from_reals(dom, cod, &data).unwrap()
}

fn take<'a>(idx: &'a [usize], lens: &[usize]) -> Vec<&'a [usize]> {
    let mut parts = Vec::with_capacity(lens.len());
    let mut offset = 0;
    for &len in lens {
        parts.push(&idx[offset..offset + len]);
        offset += len;
    }
    parts
}

fn join(parts: &[&[usize]]) -> Vec<usize> {
    parts.iter().flat_map(|p| p.iter().copied()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Property: f ⊗ g groups classical legs, then ket legs, then bra legs
    #[test]
    fn test_tensor_leg_grouping(
        (f_dom, f_cod, g_dom, g_cod) in (cq_strategy(), cq_strategy(), cq_strategy(), cq_strategy())
            .prop_filter("too many entries", |(a, b, c, d)| small_enough(&[a, b, c, d])),
        seed in 0usize..13,
    ) {
        let f = sample_map(f_dom.clone(), f_cod.clone(), seed);
        let g = sample_map(g_dom.clone(), g_cod.clone(), seed + 5);
        let fg = f.tensor(&g);

        prop_assert_eq!(fg.dom(), &f_dom.tensor(&g_dom));
        prop_assert_eq!(fg.cod(), &f_cod.tensor(&g_cod));

        let (fc0, fq0) = (f_dom.classical.len(), f_dom.quantum.len());
        let (gc0, gq0) = (g_dom.classical.len(), g_dom.quantum.len());
        let (fc1, fq1) = (f_cod.classical.len(), f_cod.quantum.len());
        let (gc1, gq1) = (g_cod.classical.len(), g_cod.quantum.len());
        let lens = [fc0, gc0, fq0, gq0, fq0, gq0, fc1, gc1, fq1, gq1, fq1, gq1];

        for (idx, value) in fg.array().indexed_iter() {
            let p = take(idx.slice(), &lens);
            let fi = join(&[p[0], p[2], p[4], p[6], p[8], p[10]]);
            let gi = join(&[p[1], p[3], p[5], p[7], p[9], p[11]]);
            let expected = f.array()[IxDyn(&fi)] * g.array()[IxDyn(&gi)];
            prop_assert!((value - expected).norm() < 1e-9, "leg mismatch at {:?}", idx);
        }
    }
}

proptest! {
    // Property: dagger is an involution
    #[test]
    fn test_dagger_involution(
        (dom, cod) in (cq_strategy(), cq_strategy())
            .prop_filter("too many entries", |(a, b)| small_enough(&[a, b])),
        seed in 0usize..13,
    ) {
        let f = sample_map(dom, cod, seed);
        prop_assert_eq!(f.dagger().dagger(), f);
    }

    // Property: bitstring conversions are inverse
    #[test]
    fn test_bitstring_round_trip(length in 1usize..=8, raw in any::<usize>()) {
        let i = raw % (1 << length);
        let bits = index2bitstring(i, length);
        prop_assert_eq!(bits.len(), length);
        prop_assert_eq!(bitstring2index(&bits), i);
    }
}

#[test]
fn test_bitstring_round_trip_exhaustive() {
    for length in 1..=8 {
        for i in 0..1usize << length {
            assert_eq!(bitstring2index(&index2bitstring(i, length)), i);
        }
    }
}
