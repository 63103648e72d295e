//! Reader and writer for the Ignition transcript format.
//!
//! A transcript file is a 28-byte big-endian manifest followed by `num_g1_points` G1 points
//! and `num_g2_points` G2 points. Every base-field coordinate is four 64-bit limbs, least
//! significant limb first, each limb big-endian, in canonical (non-Montgomery) form.
//! The trailing checksum of the published files is not read.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, ensure, Context, Result};
use ark_bn254::{Fq, Fq2, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInt, PrimeField};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

/// Size of the manifest header in bytes.
pub const MANIFEST_SIZE: usize = 28;
/// Size of one G1 point on disk.
pub const G1_POINT_SIZE: usize = 64;
/// Size of one G2 point on disk.
pub const G2_POINT_SIZE: usize = 128;

/// Header of a transcript file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Manifest {
    /// index of this file in the sequence
    pub transcript_number: u32,
    /// number of files in the sequence
    pub total_transcripts: u32,
    /// G1 points across all files
    pub total_g1_points: u32,
    /// G2 points across all files
    pub total_g2_points: u32,
    /// G1 points in this file
    pub num_g1_points: u32,
    /// G2 points in this file
    pub num_g2_points: u32,
    /// index of the first G1 point of this file
    pub start_from: u32,
}

/// Byte length of a transcript file with the given manifest, excluding the checksum.
pub fn get_transcript_size(manifest: &Manifest) -> usize {
    MANIFEST_SIZE
        + G1_POINT_SIZE * manifest.num_g1_points as usize
        + G2_POINT_SIZE * manifest.num_g2_points as usize
}

fn read_manifest<R: Read>(reader: &mut R) -> Result<Manifest> {
    Ok(Manifest {
        transcript_number: reader.read_u32::<BigEndian>()?,
        total_transcripts: reader.read_u32::<BigEndian>()?,
        total_g1_points: reader.read_u32::<BigEndian>()?,
        total_g2_points: reader.read_u32::<BigEndian>()?,
        num_g1_points: reader.read_u32::<BigEndian>()?,
        num_g2_points: reader.read_u32::<BigEndian>()?,
        start_from: reader.read_u32::<BigEndian>()?,
    })
}

fn write_manifest<W: Write>(writer: &mut W, manifest: &Manifest) -> Result<()> {
    writer.write_u32::<BigEndian>(manifest.transcript_number)?;
    writer.write_u32::<BigEndian>(manifest.total_transcripts)?;
    writer.write_u32::<BigEndian>(manifest.total_g1_points)?;
    writer.write_u32::<BigEndian>(manifest.total_g2_points)?;
    writer.write_u32::<BigEndian>(manifest.num_g1_points)?;
    writer.write_u32::<BigEndian>(manifest.num_g2_points)?;
    writer.write_u32::<BigEndian>(manifest.start_from)?;
    Ok(())
}

fn read_fq<R: Read>(reader: &mut R) -> Result<Fq> {
    let mut limbs = [0u64; 4];
    for limb in limbs.iter_mut() {
        *limb = reader.read_u64::<BigEndian>()?;
    }
    Fq::from_bigint(BigInt::new(limbs)).ok_or_else(|| anyhow!("coordinate is not reduced"))
}

fn write_fq<W: Write>(writer: &mut W, value: &Fq) -> Result<()> {
    for limb in value.into_bigint().0.iter() {
        writer.write_u64::<BigEndian>(*limb)?;
    }
    Ok(())
}

fn read_g1<R: Read>(reader: &mut R) -> Result<G1Affine> {
    let x = read_fq(reader)?;
    let y = read_fq(reader)?;
    let point = G1Affine::new_unchecked(x, y);
    ensure!(point.is_on_curve(), "G1 point is not on the curve");
    Ok(point)
}

fn write_g1<W: Write>(writer: &mut W, point: &G1Affine) -> Result<()> {
    let (x, y) = point
        .xy()
        .ok_or_else(|| anyhow!("cannot encode the point at infinity"))?;
    write_fq(writer, x)?;
    write_fq(writer, y)
}

fn read_g2<R: Read>(reader: &mut R) -> Result<G2Affine> {
    let x_c0 = read_fq(reader)?;
    let x_c1 = read_fq(reader)?;
    let y_c0 = read_fq(reader)?;
    let y_c1 = read_fq(reader)?;
    let point = G2Affine::new_unchecked(Fq2::new(x_c0, x_c1), Fq2::new(y_c0, y_c1));
    ensure!(
        point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve(),
        "G2 point is not in the prime-order subgroup"
    );
    Ok(point)
}

fn write_g2<W: Write>(writer: &mut W, point: &G2Affine) -> Result<()> {
    let (x, y) = point
        .xy()
        .ok_or_else(|| anyhow!("cannot encode the point at infinity"))?;
    write_fq(writer, &x.c0)?;
    write_fq(writer, &x.c1)?;
    write_fq(writer, &y.c0)?;
    write_fq(writer, &y.c1)
}

/// `{dir}/monomial/transcriptNN.dat`
pub fn get_transcript_path<P: AsRef<Path>>(dir: P, num: usize) -> PathBuf {
    dir.as_ref()
        .join("monomial")
        .join(format!("transcript{:02}.dat", num))
}

/// Read the first `degree` monomial points `[x^i]_1`, walking the transcript files in order.
pub fn read_transcript_g1<P: AsRef<Path>>(degree: usize, dir: P) -> Result<Vec<G1Affine>> {
    let mut monomials = Vec::with_capacity(degree);
    let mut num = 0;
    let mut path = get_transcript_path(&dir, num);

    while path.exists() && monomials.len() < degree {
        let file =
            File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let mut reader = BufReader::new(file);
        let manifest = read_manifest(&mut reader)?;
        let num_to_read = std::cmp::min(
            manifest.num_g1_points as usize,
            degree - monomials.len(),
        );
        for _ in 0..num_to_read {
            monomials.push(read_g1(&mut reader)?);
        }
        num += 1;
        path = get_transcript_path(&dir, num);
    }

    ensure!(
        monomials.len() >= degree,
        "only read {} points from {}, but require {}; is the reference string large enough?",
        monomials.len(),
        dir.as_ref().display(),
        degree
    );
    tracing::debug!(
        "read {} monomial points from {}",
        monomials.len(),
        dir.as_ref().display()
    );
    Ok(monomials)
}

/// Read `[x]_2`, from `{dir}/g2.dat` when present, otherwise from after the G1 points of the
/// first transcript file.
pub fn read_transcript_g2<P: AsRef<Path>>(dir: P) -> Result<G2Affine> {
    let g2_path = dir.as_ref().join("g2.dat");
    if g2_path.exists() {
        let file = File::open(&g2_path)
            .with_context(|| format!("opening {}", g2_path.display()))?;
        let mut reader = BufReader::new(file);
        return read_g2(&mut reader);
    }

    let path = get_transcript_path(&dir, 0);
    let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let manifest = read_manifest(&mut reader)?;
    ensure!(manifest.num_g2_points > 0, "{} has no G2 points", path.display());
    let offset = MANIFEST_SIZE + G1_POINT_SIZE * manifest.num_g1_points as usize;
    reader.seek(SeekFrom::Start(offset as u64))?;
    read_g2(&mut reader)
}

/// Read both the monomial points and `[x]_2`.
pub fn read_transcript<P: AsRef<Path>>(degree: usize, dir: P) -> Result<(Vec<G1Affine>, G2Affine)> {
    let monomials = read_transcript_g1(degree, &dir)?;
    let g2_x = read_transcript_g2(&dir)?;
    Ok((monomials, g2_x))
}

/// Write a single transcript file holding the given points.
pub fn write_transcript<P: AsRef<Path>>(
    g1_points: &[G1Affine],
    g2_points: &[G2Affine],
    manifest: &Manifest,
    path: P,
) -> Result<()> {
    ensure!(
        manifest.num_g1_points as usize == g1_points.len()
            && manifest.num_g2_points as usize == g2_points.len(),
        "manifest does not match the number of points"
    );
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_manifest(&mut writer, manifest)?;
    for point in g1_points {
        write_g1(&mut writer, point)?;
    }
    for point in g2_points {
        write_g2(&mut writer, point)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `{dir}/g2.dat`.
pub fn write_g2_file<P: AsRef<Path>>(g2_x: &G2Affine, dir: P) -> Result<()> {
    std::fs::create_dir_all(dir.as_ref())?;
    let mut writer = BufWriter::new(File::create(dir.as_ref().join("g2.dat"))?);
    write_g2(&mut writer, g2_x)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn encode_manifest(manifest: &Manifest) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MANIFEST_SIZE);
    // writing to a Vec cannot fail
    let _ = write_manifest(&mut buf, manifest);
    buf
}
