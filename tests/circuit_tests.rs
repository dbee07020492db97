//circuit_tests.rs

#[cfg(test)]
mod tests {
    use num_complex::Complex64;

    use cqmap::category::DiagramFunctor;
    use cqmap::quantum::gate::*;
    use cqmap::quantum::{
        Circuit, CircuitBox, CircuitFunctor, CQMap, CQMapFunctor, Dim, Evaluation, Tensor, Ty,
    };
    use cqmap::simulators::{Backend, Counts, SamplingBackend};
    use cqmap::{CountsParams, CqError, Result};

    /// Helper function for comparing flattened arrays with tolerance
    fn flat_approx_eq<'a>(actual: impl IntoIterator<Item = &'a Complex64>, expected: &[f64], epsilon: f64) -> bool {
        let actual: Vec<Complex64> = actual.into_iter().cloned().collect();
        actual.len() == expected.len()
            && actual
                .iter()
                .zip(expected)
                .all(|(a, &b)| (a - Complex64::new(b, 0.0)).norm() < epsilon)
    }

    fn real_approx_eq<'a>(actual: impl IntoIterator<Item = &'a f64>, expected: &[f64], epsilon: f64) -> bool {
        let actual: Vec<f64> = actual.into_iter().cloned().collect();
        actual.len() == expected.len() && actual.iter().zip(expected).all(|(a, b)| (a - b).abs() < epsilon)
    }

    fn bell() -> Circuit {
        ket(&[0, 0])
            .then(&h().tensor(&Circuit::id(&Ty::qubit())))
            .and_then(|c| c.then(&cx()))
            .unwrap()
    }

    /// A backend replaying fixed counts
    struct MockBackend {
        counts: Counts,
    }

    impl Backend for MockBackend {
        fn name(&self) -> &str {
            "mock"
        }

        fn get_counts(&self, _circuit: &Circuit, _params: &CountsParams) -> Result<Counts> {
            Ok(self.counts.clone())
        }
    }

    #[test]
    fn test_not_gate_evaluates_to_its_matrix() {
        let tensor = x().eval().unwrap().into_tensor().unwrap();
        assert_eq!(tensor.dom(), &Dim::new([2]));
        assert!(flat_approx_eq(tensor.array(), &[0., 1., 1., 0.], 1e-12));
    }

    #[test]
    fn test_measurement_evaluates_to_a_delta() {
        let map = measure(1, true).eval().unwrap().into_cq_map().unwrap();
        assert!(flat_approx_eq(map.array(), &[1., 0., 0., 0., 0., 0., 0., 1.], 1e-12));
    }

    #[test]
    fn test_discarding_prepared_systems_is_trivial() {
        let prepared = bits(&[1, 0]).tensor(&ket(&[0]));
        let circuit = prepared.then(&discard(&Ty::bits(2).tensor(&Ty::qubit()))).unwrap();
        assert!(circuit.is_mixed());
        let eval = circuit.eval().unwrap();
        assert!(eval.is_mixed());
        assert!(flat_approx_eq(eval.array(), &[1.0], 1e-12));
    }

    #[test]
    fn test_born_rule_table_of_not_gate() {
        let table = x().measure(false).unwrap();
        assert_eq!(table.shape(), &[2, 2]);
        assert!(real_approx_eq(table.iter(), &[0., 1., 1., 0.], 1e-12));

        let mixed = x().measure(true).unwrap();
        assert!(real_approx_eq(mixed.iter(), &[0., 1., 1., 0.], 1e-12));

        let closed = ket(&[0]).then(&x()).and_then(|c| c.then(&bra(&[1]))).unwrap();
        let scalar = closed.measure(false).unwrap();
        assert!(real_approx_eq(scalar.iter(), &[table[[0, 1]]], 1e-12));
    }

    #[test]
    fn test_born_rule_table_of_hadamard() {
        let table = h().measure(false).unwrap();
        assert!(real_approx_eq(table.iter(), &[0.5; 4], 1e-12));
        let mixed = h().measure(true).unwrap();
        assert!(real_approx_eq(mixed.iter(), &[0.5; 4], 1e-12));
    }

    #[test]
    fn test_pure_and_mixed_evaluation_agree() {
        for circuit in [h(), x().tensor(&h()), cx(), rx(0.25), crz(0.125)] {
            let pure = CQMap::pure(&circuit.eval_tensor().unwrap());
            let mixed = circuit.eval_mixed().unwrap();
            assert!(pure.is_close(&mixed), "{} disagrees", circuit);
        }
    }

    #[test]
    fn test_gates_are_unitary() {
        for circuit in [x(), y(), z(), h(), s(), t(), cx(), cz(), swap(), rx(0.3), rz(0.7), crz(0.2)] {
            let u = circuit.eval_tensor().unwrap();
            let product = u.then(&u.dagger()).unwrap();
            assert!(product.is_close(&Tensor::id(u.dom())), "{} is not unitary", circuit);
        }
    }

    #[test]
    fn test_circuit_dagger_matches_tensor_dagger() {
        let circuit = h().tensor(&t()).then(&cx()).unwrap();
        let lhs = circuit.dagger().eval_tensor().unwrap();
        let rhs = circuit.eval_tensor().unwrap().dagger();
        assert!(lhs.is_close(&rhs));
        assert_eq!(circuit.dagger().dagger(), circuit);
    }

    #[test]
    fn test_circuit_cups_and_caps() {
        let ty = Ty::qubit();
        let snake = Circuit::caps(&ty, &ty)
            .unwrap()
            .tensor(&Circuit::id(&ty))
            .then(&Circuit::id(&ty).tensor(&Circuit::cups(&ty, &ty).unwrap()))
            .unwrap();
        let image = snake.eval_tensor().unwrap();
        assert!(image.is_close(&Tensor::id(&Dim::new([2]))));
    }

    #[test]
    fn test_swaps_between_bits_and_qubits() {
        let circuit = Circuit::swap(&Ty::bit(), &Ty::qubit());
        let map = circuit.eval_mixed().unwrap();
        assert!(map.is_causal());
        let back = Circuit::swap(&Ty::qubit(), &Ty::bit());
        let round_trip = circuit.then(&back).unwrap().eval_mixed().unwrap();
        assert!(round_trip.is_close(&CQMap::id(map.dom())));
    }

    #[test]
    fn test_analytic_counts() {
        let counts = bell().get_counts(None, &CountsParams::default()).unwrap();
        assert_eq!(counts.keys().cloned().collect::<Vec<_>>(), vec![vec![0, 0], vec![1, 1]]);

        let coin = ket(&[0])
            .then(&h())
            .and_then(|c| c.then(&measure(1, true)))
            .unwrap();
        let counts = coin.get_counts(None, &CountsParams::default()).unwrap();
        assert!((counts[&vec![0]] - 0.5).abs() < 1e-10);
        assert!((counts[&vec![1]] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_counts_from_a_backend_are_normalized() {
        let circuit = h()
            .tensor(&x())
            .then(&cx())
            .and_then(|c| c.then(&measure(2, true)))
            .unwrap();
        let backend = MockBackend {
            counts: Counts::from([(vec![0, 1], 512.0), (vec![1, 0], 512.0)]),
        };
        let params = CountsParams::default().with_shots(1 << 10);
        let counts = circuit.get_counts(Some(&backend), &params).unwrap();
        assert_eq!(counts, Counts::from([(vec![0, 1], 0.5), (vec![1, 0], 0.5)]));

        let raw = circuit
            .get_counts(Some(&backend), &params.clone().with_normalize(false))
            .unwrap();
        assert_eq!(raw[&vec![0, 1]], 512.0);

        let tensor = circuit.eval_on(&backend, &params).unwrap();
        assert_eq!(tensor.cod(), &Dim::new([2, 2]));
        assert!(flat_approx_eq(tensor.array(), &[0., 0.5, 0.5, 0.], 1e-12));

        let raw = circuit.eval_on(&backend, &params.clone().with_normalize(false)).unwrap();
        assert!(flat_approx_eq(raw.array(), &[0., 512., 512., 0.], 1e-12));

        let eval = circuit.evaluate(Some(&backend), false, &params).unwrap();
        assert!(matches!(eval, Evaluation::Tensor(_)));
    }

    #[test]
    fn test_backend_returning_nothing() {
        let backend = MockBackend { counts: Counts::new() };
        let err = x().eval_on(&backend, &CountsParams::default()).unwrap_err();
        assert!(matches!(err, CqError::Backend(_)));
    }

    #[test]
    fn test_sampling_backend_is_reproducible() {
        let backend = SamplingBackend::new();
        let params = CountsParams::default().with_shots(500).with_seed(42);
        let first = backend.get_counts(&bell(), &params).unwrap();
        let second = backend.get_counts(&bell(), &params).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.values().sum::<f64>(), 500.0);
        assert!(first.keys().all(|k| k == &vec![0, 0] || k == &vec![1, 1]));

        let normalized = bell().get_counts(Some(&backend), &params).unwrap();
        assert!((normalized.values().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_iqp_parameter_shape() {
        let err = iqp_ansatz(2, &[vec![0.1, 0.2]]).unwrap_err();
        assert!(matches!(err, CqError::ParamShape { .. }));
        let circuit = iqp_ansatz(2, &[vec![0.1], vec![0.2]]).unwrap();
        let u = circuit.eval_tensor().unwrap();
        assert!(u.then(&u.dagger()).unwrap().is_close(&Tensor::id(&Dim::new([2, 2]))));
    }

    #[test]
    fn test_functor_reports_missing_mappings() {
        let oracle: Circuit = CircuitBox::symbol("oracle", Ty::qubit(), Ty::bit()).into();
        let err = oracle.eval().unwrap_err();
        assert!(matches!(err, CqError::MissingMapping(_)));

        let functor = CQMapFunctor::default().with_arrow("oracle", CQMap::measure(&Dim::new([2]), true));
        let map = functor.map_circuit(&oracle).unwrap();
        assert!(map.is_causal());
    }

    #[test]
    fn test_classical_gates() {
        let not = cgate_func("NOT", 1, 1, |b| vec![1 - b[0]]).unwrap();
        let circuit = bits(&[1]).then(&not).unwrap();
        let counts = circuit.get_counts(None, &CountsParams::default()).unwrap();
        assert_eq!(counts, Counts::from([(vec![0], 1.0)]));
        assert!(cgate("AND", 2, 1, &[1., 0., 1., 0.]).is_err());
    }

    #[test]
    fn test_classical_spider_copies_a_bit() {
        let circuit = bits(&[1]).then(&spider(1, 2, true)).unwrap();
        let counts = circuit.get_counts(None, &CountsParams::default()).unwrap();
        assert_eq!(counts, Counts::from([(vec![1, 1], 1.0)]));
        assert_eq!(spider(1, 2, true).to_string(), "Spider(1, 2, classical=True)");
    }

    #[test]
    fn test_quantum_spiders() {
        let copy = spider(1, 2, false);
        assert!(CQMap::pure(&copy.eval_tensor().unwrap()).is_causal());
        assert!(copy.eval_mixed().unwrap().is_causal());

        let merge = spider(2, 1, false).eval_tensor().unwrap();
        assert!(copy.dagger().eval_tensor().unwrap().is_close(&merge));

        let id = spider(1, 1, false).eval_tensor().unwrap();
        assert!(id.is_close(&Tensor::id(&Dim::new([2]))));
    }

    #[test]
    fn test_permutations_invert() {
        let perm = [2, 0, 1];
        let mut inverse = [0; 3];
        for (i, &p) in perm.iter().enumerate() {
            inverse[p] = i;
        }

        let forward = Circuit::permutation(&perm, &Ty::qubits(3)).unwrap();
        let back = Circuit::permutation(&inverse, forward.cod()).unwrap();
        let round_trip = forward.then(&back).unwrap().eval_tensor().unwrap();
        assert!(round_trip.is_close(&Tensor::id(&Dim::new([2, 2, 2]))));

        let dom = Ty::bit().tensor(&Ty::qubits(2));
        let forward = Circuit::permutation(&perm, &dom).unwrap();
        assert_eq!(forward.cod(), &Ty::qubits(2).tensor(&Ty::bit()));
        let back = Circuit::permutation(&inverse, forward.cod()).unwrap();
        let map = forward.then(&back).unwrap().eval_mixed().unwrap();
        assert!(map.is_close(&CQMap::id(map.dom())));

        let transposition = Circuit::permutation(&[1, 0], &Ty::qubits(2)).unwrap();
        assert!(transposition
            .eval_tensor()
            .unwrap()
            .is_close(&swap().eval_tensor().unwrap()));
    }

    #[test]
    fn test_circuit_functor_rewrites_not_gates() {
        let hzh = h().then(&z()).and_then(|c| c.then(&h())).unwrap();
        let functor = CircuitFunctor::default().with_arrow("X", hzh);
        let circuit = ket(&[0, 1])
            .then(&x().tensor(&Circuit::id(&Ty::qubit())))
            .and_then(|c| c.then(&cx()))
            .unwrap();
        let rewritten = functor.map_circuit(&circuit).unwrap();
        assert!(rewritten.boxes().all(|b| b.name != "X"));
        assert!(rewritten
            .eval_tensor()
            .unwrap()
            .is_close(&circuit.eval_tensor().unwrap()));
    }
}
