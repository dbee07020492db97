//! Gate library
//!
//! Standard quantum and classical gates, state preparations and effects,
//! the mixed boxes (measurement, encoding, discarding) and two ansätze.
//! Arrays list the input index first: `CX` maps `|10⟩` to `|11⟩`.

use std::f64::consts::PI;

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::circuit::{BoxKind, Circuit, CircuitBox, Obj, Ty};
use super::tensor::{indicator, ravel};
use crate::error::{CqError, Result};

/// Common complex numbers used in gates
pub mod constants {
    use num_complex::Complex64;

    /// The imaginary unit i
    pub const I: Complex64 = Complex64::new(0.0, 1.0);

    /// 1/sqrt(2)
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
}

fn reals(values: &[f64]) -> Vec<Complex64> {
    values.iter().map(|&x| Complex64::new(x, 0.0)).collect()
}

/// Builds one of the fixed gates below; their entry counts are known to fit
fn fixed_gate(name: &str, n_qubits: usize, entries: Vec<Complex64>) -> Circuit {
    let ty = Ty::qubits(n_qubits);
    let shape = vec![2; 2 * n_qubits];
    let array = ndarray::ArrayD::from_shape_fn(ndarray::IxDyn(&shape), |idx| {
        use ndarray::Dimension;
        entries[ravel(idx.slice(), &shape)]
    });
    CircuitBox::new(
        name,
        ty.clone(),
        ty,
        BoxKind::PureGate {
            array,
            classical: false,
        },
    )
    .into()
}

/// A quantum gate on `n_qubits` from its row-major entries
pub fn qgate(name: &str, n_qubits: usize, entries: Vec<Complex64>) -> Result<Circuit> {
    let ty = Ty::qubits(n_qubits);
    Ok(CircuitBox::pure(name, ty.clone(), ty, entries)?.into())
}

/// A classical gate from `n_bits_in` to `n_bits_out` bits
pub fn cgate(name: &str, n_bits_in: usize, n_bits_out: usize, entries: &[f64]) -> Result<Circuit> {
    Ok(CircuitBox::pure(name, Ty::bits(n_bits_in), Ty::bits(n_bits_out), reals(entries))?.into())
}

/// The classical gate of a boolean function
pub fn cgate_func(
    name: &str,
    n_bits_in: usize,
    n_bits_out: usize,
    function: impl Fn(&[u8]) -> Vec<u8>,
) -> Result<Circuit> {
    let n_out = 1usize << n_bits_out;
    let mut entries = vec![0.0; (1usize << n_bits_in) * n_out];
    for i in 0..1usize << n_bits_in {
        let input = super::evaluation::index2bitstring(i, n_bits_in);
        let output = function(&input);
        if output.len() != n_bits_out {
            return Err(CqError::DimensionMismatch(format!(
                "{} returned {} bits, expected {}",
                name,
                output.len(),
                n_bits_out
            )));
        }
        if output.iter().any(|&b| b > 1) {
            return Err(CqError::DimensionMismatch(format!(
                "{} returned {:?} on {:?}, expected bits",
                name, output, input
            )));
        }
        entries[i * n_out + super::evaluation::bitstring2index(&output)] = 1.0;
    }
    cgate(name, n_bits_in, n_bits_out, &entries)
}

fn basis_entries(bitstring: &[u8]) -> Vec<Complex64> {
    let target = super::evaluation::bitstring2index(bitstring);
    (0..1usize << bitstring.len())
        .map(|i| indicator(i == target))
        .collect()
}

fn bitstring_name(kind: &str, bitstring: &[u8]) -> String {
    let bits: Vec<String> = bitstring.iter().map(|b| b.to_string()).collect();
    format!("{}({})", kind, bits.join(", "))
}

fn basis_box(kind: &str, bitstring: &[u8], dom: Ty, cod: Ty, classical: bool) -> CircuitBox {
    let entries = basis_entries(bitstring);
    let shape = vec![2; bitstring.len()];
    let array = ndarray::ArrayD::from_shape_fn(ndarray::IxDyn(&shape), |idx| {
        use ndarray::Dimension;
        entries[ravel(idx.slice(), &shape)]
    });
    CircuitBox::new(
        bitstring_name(kind, bitstring),
        dom,
        cod,
        BoxKind::PureGate { array, classical },
    )
}

/// The spider `|0…0⟩⟨0…0| + |1…1⟩⟨1…1|` on bits or qubits.
///
/// On bits it copies (`n_legs_out > 1`) or compares (`n_legs_in > 1`) its input.
pub fn spider(n_legs_in: usize, n_legs_out: usize, classical: bool) -> Circuit {
    let (dom, cod) = if classical {
        (Ty::bits(n_legs_in), Ty::bits(n_legs_out))
    } else {
        (Ty::qubits(n_legs_in), Ty::qubits(n_legs_out))
    };
    let shape = vec![2; n_legs_in + n_legs_out];
    let array = ndarray::ArrayD::from_shape_fn(ndarray::IxDyn(&shape), |idx| {
        use ndarray::Dimension;
        let idx = idx.slice();
        indicator(idx.iter().all(|&i| i == idx[0]))
    });
    let name = format!(
        "Spider({}, {}{})",
        n_legs_in,
        n_legs_out,
        if classical { ", classical=True" } else { "" }
    );
    let classical = classical && !shape.is_empty();
    CircuitBox::new(name, dom, cod, BoxKind::PureGate { array, classical }).into()
}

/// Classical preparation of a bitstring
pub fn bits(bitstring: &[u8]) -> Circuit {
    basis_box("Bits", bitstring, Ty::unit(), Ty::bits(bitstring.len()), true).into()
}

/// Preparation of a computational basis state
pub fn ket(bitstring: &[u8]) -> Circuit {
    basis_box("Ket", bitstring, Ty::unit(), Ty::qubits(bitstring.len()), false).into()
}

/// Post-selection on a computational basis state
pub fn bra(bitstring: &[u8]) -> Circuit {
    basis_box("Bra", bitstring, Ty::qubits(bitstring.len()), Ty::unit(), false).into()
}

pub fn x() -> Circuit {
    fixed_gate("X", 1, reals(&[0., 1., 1., 0.]))
}

pub fn y() -> Circuit {
    use self::constants::I;
    let zero = Complex64::new(0.0, 0.0);
    fixed_gate("Y", 1, vec![zero, -I, I, zero])
}

pub fn z() -> Circuit {
    fixed_gate("Z", 1, reals(&[1., 0., 0., -1.]))
}

pub fn h() -> Circuit {
    let r = constants::FRAC_1_SQRT_2;
    fixed_gate("H", 1, reals(&[r, r, r, -r]))
}

pub fn s() -> Circuit {
    let mut entries = reals(&[1., 0., 0., 0.]);
    entries[3] = constants::I;
    fixed_gate("S", 1, entries)
}

pub fn t() -> Circuit {
    let mut entries = reals(&[1., 0., 0., 0.]);
    entries[3] = Complex64::from_polar(1.0, PI / 4.0);
    fixed_gate("T", 1, entries)
}

pub fn cx() -> Circuit {
    fixed_gate(
        "CX",
        2,
        reals(&[
            1., 0., 0., 0., //
            0., 1., 0., 0., //
            0., 0., 0., 1., //
            0., 0., 1., 0.,
        ]),
    )
}

pub fn cz() -> Circuit {
    fixed_gate(
        "CZ",
        2,
        reals(&[
            1., 0., 0., 0., //
            0., 1., 0., 0., //
            0., 0., 1., 0., //
            0., 0., 0., -1.,
        ]),
    )
}

pub fn swap() -> Circuit {
    swap_box(Obj::Qubit, Obj::Qubit).into()
}

/// Rotation about x by `phase` half turns, up to a global phase
pub fn rx(phase: f64) -> Circuit {
    let half_theta = PI * phase;
    let global = Complex64::from_polar(1.0, half_theta);
    let (sin, cos) = half_theta.sin_cos();
    let off = -constants::I * sin;
    let entries = [cos.into(), off, off, cos.into()]
        .iter()
        .map(|&z: &Complex64| global * z)
        .collect();
    fixed_gate(&format!("Rx({})", phase), 1, entries)
}

/// Rotation about z by `phase` turns
pub fn rz(phase: f64) -> Circuit {
    let mut entries = reals(&[1., 0., 0., 0.]);
    entries[3] = Complex64::from_polar(1.0, 2.0 * PI * phase);
    fixed_gate(&format!("Rz({})", phase), 1, entries)
}

/// Controlled z rotation by `phase` turns
pub fn crz(phase: f64) -> Circuit {
    let mut entries = reals(&[
        1., 0., 0., 0., //
        0., 1., 0., 0., //
        0., 0., 1., 0., //
        0., 0., 0., 0.,
    ]);
    entries[15] = Complex64::from_polar(1.0, 2.0 * PI * phase);
    fixed_gate(&format!("CRz({})", phase), 2, entries)
}

/// A scalar gate with no wires
pub fn scalar(value: Complex64) -> Circuit {
    fixed_gate(&format!("scalar({:.3})", value), 0, vec![value])
}

pub fn sqrt(real: f64) -> Circuit {
    fixed_gate(&format!("sqrt({})", real), 0, vec![Complex64::new(real.sqrt(), 0.0)])
}

pub(crate) fn swap_box(left: Obj, right: Obj) -> CircuitBox {
    let name = if left == Obj::Qubit && right == Obj::Qubit {
        "SWAP".to_string()
    } else {
        format!("Swap({}, {})", left, right)
    };
    CircuitBox::new(
        name,
        Ty::new(vec![left, right]),
        Ty::new(vec![right, left]),
        BoxKind::Swap { left, right },
    )
}

pub(crate) fn discard_box(dom: &Ty) -> CircuitBox {
    CircuitBox::new(format!("Discard({})", dom), dom.clone(), Ty::unit(), BoxKind::Discard)
}

pub(crate) fn mixed_state_box(cod: &Ty) -> CircuitBox {
    CircuitBox::new(format!("MixedState({})", cod), Ty::unit(), cod.clone(), BoxKind::MixedState)
}

pub(crate) fn measure_box(n_qubits: usize, destructive: bool) -> CircuitBox {
    let (cod, name) = if destructive {
        (Ty::bits(n_qubits), format!("Measure({})", n_qubits))
    } else {
        (
            Ty::qubits(n_qubits).tensor(&Ty::bits(n_qubits)),
            format!("Measure({}, destructive=False)", n_qubits),
        )
    };
    CircuitBox::new(name, Ty::qubits(n_qubits), cod, BoxKind::Measure { destructive })
}

pub(crate) fn encode_box(n_bits: usize, constructive: bool) -> CircuitBox {
    let (dom, name) = if constructive {
        (Ty::bits(n_bits), format!("Encode({})", n_bits))
    } else {
        (
            Ty::qubits(n_bits).tensor(&Ty::bits(n_bits)),
            format!("Encode({}, constructive=False)", n_bits),
        )
    };
    CircuitBox::new(name, dom, Ty::qubits(n_bits), BoxKind::Encode { constructive })
}

/// Discards the given wires
pub fn discard(dom: &Ty) -> Circuit {
    discard_box(dom).into()
}

/// The maximally mixed state on the given wires
pub fn mixed_state(cod: &Ty) -> Circuit {
    mixed_state_box(cod).into()
}

/// Measures `n_qubits` in the computational basis, keeping the qubits unless `destructive`
pub fn measure(n_qubits: usize, destructive: bool) -> Circuit {
    measure_box(n_qubits, destructive).into()
}

/// Encodes `n_bits` as basis states, consuming qubits as well unless `constructive`
pub fn encode(n_bits: usize, constructive: bool) -> Circuit {
    encode_box(n_bits, constructive).into()
}

fn place(n_qubits: usize, offset: usize, gate: &Circuit) -> Circuit {
    let rest = n_qubits - offset - gate.dom().len();
    Circuit::id(&Ty::qubits(offset))
        .tensor(gate)
        .tensor(&Circuit::id(&Ty::qubits(rest)))
}

/// Instantaneous quantum polynomial ansatz.
///
/// Every layer applies a Hadamard to each qubit then a ladder of `CRz`
/// rotations, one row of `params` per layer with `n_qubits - 1` angles.
/// A single qubit gets the Euler decomposition `Rx >> Rz >> Rx` from a
/// single row of three angles.
pub fn iqp_ansatz(n_qubits: usize, params: &[Vec<f64>]) -> Result<Circuit> {
    if n_qubits == 1 {
        return match params {
            [row] if row.len() == 3 => rx(row[0]).then(&rz(row[1]))?.then(&rx(row[2])),
            _ => Err(CqError::ParamShape {
                expected: "(1, 3)".to_string(),
                got: format!("{:?}", params.iter().map(Vec::len).collect::<Vec<_>>()),
            }),
        };
    }
    if let Some(row) = params.iter().find(|row| row.len() != n_qubits.saturating_sub(1)) {
        return Err(CqError::ParamShape {
            expected: format!("(depth, {})", n_qubits.saturating_sub(1)),
            got: format!("({}, {})", params.len(), row.len()),
        });
    }

    let mut circuit = Circuit::id(&Ty::qubits(n_qubits));
    for thetas in params {
        for i in 0..n_qubits {
            circuit = circuit.then(&place(n_qubits, i, &h()))?;
        }
        for (i, &theta) in thetas.iter().enumerate() {
            circuit = circuit.then(&place(n_qubits, i, &crz(theta)))?;
        }
    }
    Ok(circuit)
}

/// A random circuit over `{H, Rx, CX}`.
///
/// A single qubit gets a random Euler decomposition, wider registers get
/// `depth` rows of gates tiling every qubit.
pub fn random_tiling(n_qubits: usize, depth: usize, seed: Option<u64>) -> Result<Circuit> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    if n_qubits == 1 {
        let phases: [f64; 3] = rng.gen();
        return rx(phases[0]).then(&rz(phases[1]))?.then(&rx(phases[2]));
    }

    let mut circuit = Circuit::id(&Ty::qubits(n_qubits));
    for _ in 0..depth {
        let mut line = Circuit::id(&Ty::unit());
        while line.dom().len() < n_qubits {
            let room = n_qubits - line.dom().len();
            let n_choices = if room > 1 { 3 } else { 2 };
            let gate = match rng.gen_range(0..n_choices) {
                0 => h(),
                1 => rx(rng.gen()),
                _ => cx(),
            };
            line = line.tensor(&gate);
        }
        circuit = circuit.then(&line)?;
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kets_are_one_hot() {
        let k = ket(&[1, 0]);
        let layer = &k.layers()[0];
        match &layer.boxed.kind {
            BoxKind::PureGate { array, classical } => {
                assert!(!classical);
                assert_eq!(array[[1, 0]], Complex64::new(1.0, 0.0));
                assert_eq!(array.iter().filter(|z| z.norm() > 0.0).count(), 1);
            }
            other => panic!("unexpected box kind {:?}", other),
        }
        assert_eq!(k.to_string(), "Ket(1, 0)");
    }

    #[test]
    fn cgate_func_tabulates_functions() {
        let not = cgate_func("NOT", 1, 1, |bits| vec![1 - bits[0]]).unwrap();
        match &not.layers()[0].boxed.kind {
            BoxKind::PureGate { array, classical } => {
                assert!(classical);
                assert_eq!(array[[0, 1]], Complex64::new(1.0, 0.0));
                assert_eq!(array[[0, 0]], Complex64::new(0.0, 0.0));
            }
            other => panic!("unexpected box kind {:?}", other),
        }
    }

    #[test]
    fn cgate_func_rejects_non_bits() {
        let err = cgate_func("TWO", 1, 1, |_| vec![2]).unwrap_err();
        assert!(matches!(err, CqError::DimensionMismatch(_)));
    }

    #[test]
    fn spiders_are_two_deltas() {
        let copy = spider(1, 2, true);
        assert_eq!(copy.to_string(), "Spider(1, 2, classical=True)");
        assert_eq!(copy.cod(), &Ty::bits(2));
        match &copy.layers()[0].boxed.kind {
            BoxKind::PureGate { array, classical } => {
                assert!(*classical);
                assert_eq!(array[ndarray::IxDyn(&[0, 0, 0])], Complex64::new(1.0, 0.0));
                assert_eq!(array[ndarray::IxDyn(&[1, 1, 1])], Complex64::new(1.0, 0.0));
                assert_eq!(array.iter().filter(|z| z.norm() > 0.0).count(), 2);
            }
            other => panic!("unexpected box kind {:?}", other),
        }
        assert_eq!(spider(2, 1, false).dom(), &Ty::qubits(2));
    }

    #[test]
    fn iqp_ansatz_checks_parameter_shape() {
        let circuit = iqp_ansatz(3, &[vec![0.1, 0.2], vec![0.3, 0.4]]).unwrap();
        assert_eq!(circuit.boxes().count(), 10);
        assert_eq!(circuit.dom(), &Ty::qubits(3));

        let euler = iqp_ansatz(1, &[vec![0.3, 0.8, 0.4]]).unwrap();
        assert_eq!(euler.to_string(), "Rx(0.3) >> Rz(0.8) >> Rx(0.4)");

        assert!(matches!(
            iqp_ansatz(3, &[vec![0.1, 0.2, 0.3]]),
            Err(CqError::ParamShape { .. })
        ));
        assert!(iqp_ansatz(1, &[vec![0.1]]).is_err());
    }

    #[test]
    fn random_tiling_is_reproducible() {
        let a = random_tiling(3, 2, Some(420)).unwrap();
        let b = random_tiling(3, 2, Some(420)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dom(), &Ty::qubits(3));
        assert_eq!(random_tiling(1, 3, Some(1)).unwrap().boxes().count(), 3);
    }
}
