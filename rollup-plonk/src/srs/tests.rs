use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_std::UniformRand;

use super::io::{self, Manifest};
use super::reference_string::{
    file_reference_string::{DynamicFileReferenceStringFactory, FileReferenceStringFactory},
    mem_reference_string::MemReferenceStringFactory,
    ReferenceStringFactory,
};

fn write_split_transcripts(dir: &std::path::Path, points: &[G1Affine], g2_x: &G2Affine, split: usize) {
    let total = points.len() as u32;
    let first = Manifest {
        transcript_number: 0,
        total_transcripts: 2,
        total_g1_points: total,
        total_g2_points: 1,
        num_g1_points: split as u32,
        num_g2_points: 1,
        start_from: 0,
    };
    io::write_transcript(&points[..split], &[*g2_x], &first, io::get_transcript_path(dir, 0))
        .unwrap();
    let second = Manifest {
        transcript_number: 1,
        num_g1_points: (points.len() - split) as u32,
        num_g2_points: 0,
        start_from: split as u32,
        ..first
    };
    io::write_transcript(&points[split..], &[], &second, io::get_transcript_path(dir, 1)).unwrap();
}

fn secret_setup(size: usize) -> (Fr, Vec<G1Affine>, G2Affine) {
    let mut rng = ark_std::test_rng();
    let secret = Fr::rand(&mut rng);
    let factory = MemReferenceStringFactory::from_secret(secret, size);
    let points = factory.get_prover_crs(size).unwrap().get_monomial_points();
    let g2_x = factory.get_verifier_crs().unwrap().get_g2x();
    (secret, points.as_ref().clone(), g2_x)
}

#[test]
fn manifest_is_28_bytes() {
    let manifest = Manifest {
        transcript_number: 1,
        num_g1_points: 5,
        ..Manifest::default()
    };
    assert_eq!(io::encode_manifest(&manifest).len(), io::MANIFEST_SIZE);
    assert_eq!(io::get_transcript_size(&manifest), 28 + 5 * 64);
}

#[test]
fn read_transcript_loads_well_formed_srs() {
    let (_, points, g2_x) = secret_setup(40);
    let dir = tempfile::tempdir().unwrap();
    write_split_transcripts(dir.path(), &points, &g2_x, 25);

    let (monomials, read_g2) = io::read_transcript(33, dir.path()).unwrap();
    assert_eq!(monomials.len(), 33);
    assert_eq!(monomials[0], G1Affine::generator());
    assert_eq!(&monomials[..], &points[..33]);
    assert_eq!(read_g2, g2_x);

    // e([x]_1, [1]_2) == e([1]_1, [x]_2)
    let lhs = Bn254::pairing(monomials[1], G2Affine::generator());
    let rhs = Bn254::pairing(G1Affine::generator(), read_g2);
    assert_eq!(lhs, rhs);

    for mon in monomials.iter() {
        assert!(mon.is_on_curve());
    }
}

#[test]
fn g2_file_takes_precedence() {
    let (_, points, g2_x) = secret_setup(8);
    let dir = tempfile::tempdir().unwrap();
    write_split_transcripts(dir.path(), &points, &g2_x, 4);
    let other = (G2Affine::generator() * Fr::from(3u64)).into_affine();
    io::write_g2_file(&other, dir.path()).unwrap();
    assert_eq!(io::read_transcript_g2(dir.path()).unwrap(), other);
}

#[test]
fn short_transcript_is_an_error() {
    let (_, points, g2_x) = secret_setup(8);
    let dir = tempfile::tempdir().unwrap();
    write_split_transcripts(dir.path(), &points, &g2_x, 4);
    assert!(io::read_transcript_g1(9, dir.path()).is_err());
    let factory = FileReferenceStringFactory::new(dir.path());
    assert!(factory.get_prover_crs(9).is_err());
    assert_eq!(factory.get_prover_crs(6).unwrap().get_monomial_size(), 6);
}

#[test]
fn dynamic_factory_grows_on_demand() {
    let (_, points, g2_x) = secret_setup(16);
    let dir = tempfile::tempdir().unwrap();
    write_split_transcripts(dir.path(), &points, &g2_x, 10);
    let factory = DynamicFileReferenceStringFactory::new(dir.path(), 4).unwrap();
    assert_eq!(factory.get_prover_crs(2).unwrap().get_monomial_size(), 4);
    assert_eq!(factory.get_prover_crs(12).unwrap().get_monomial_size(), 12);
    assert_eq!(factory.get_prover_crs(5).unwrap().get_monomial_size(), 12);
    assert_eq!(factory.get_verifier_crs().unwrap().get_g2x(), g2_x);
}

#[test]
fn mem_factory_checks_size() {
    let (secret, points, _) = secret_setup(8);
    let factory = MemReferenceStringFactory::from_secret(secret, 8);
    assert!(factory.get_prover_crs(9).is_err());
    assert_eq!(
        factory.get_prover_crs(8).unwrap().get_monomial_points()[2],
        points[2]
    );
    assert_eq!(
        points[2],
        (G1Affine::generator() * (secret * secret)).into_affine()
    );
}

#[test]
fn secret_setup_holds_powers_of_the_secret() {
    let secret = Fr::from(0x5eedu64);
    let factory = MemReferenceStringFactory::from_secret(secret, 100);
    let points = factory.get_prover_crs(100).unwrap().get_monomial_points();
    let g2_x = factory.get_verifier_crs().unwrap().get_g2x();
    assert_eq!(points[0], G1Affine::generator());
    let mut power = Fr::from(1u64);
    for point in points.iter() {
        assert_eq!(*point, (G1Affine::generator() * power).into_affine());
        power *= secret;
    }
    assert_eq!(g2_x, (G2Affine::generator() * secret).into_affine());
}

#[test]
fn mem_factory_from_bytes() {
    let (_, points, g2_x) = secret_setup(4);
    let mut g1_bytes = Vec::new();
    for p in points.iter() {
        g1_bytes.extend(crate::ecc::g1_to_buffer(p));
    }
    let mut g2_bytes = Vec::new();
    ark_serialize::CanonicalSerialize::serialize_uncompressed(&g2_x, &mut g2_bytes).unwrap();
    let factory = MemReferenceStringFactory::new(&g1_bytes, &g2_bytes).unwrap();
    assert_eq!(factory.get_prover_crs(4).unwrap().get_monomial_size(), 4);
    assert!(MemReferenceStringFactory::new(&g1_bytes[1..], &g2_bytes).is_err());
}
