use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};
use ark_bn254::{G1Affine, G2Affine};

use crate::srs::io::{read_transcript_g1, read_transcript_g2};

use super::{ProverReferenceString, ReferenceStringFactory, VerifierReferenceString};

/// `[x]_2` read from a transcript directory.
#[derive(Debug, Clone)]
pub struct VerifierFileReferenceString {
    g2_x: G2Affine,
}

impl VerifierFileReferenceString {
    /// Load `[x]_2` from `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            g2_x: read_transcript_g2(path)?,
        })
    }
}

impl VerifierReferenceString for VerifierFileReferenceString {
    fn get_g2x(&self) -> G2Affine {
        self.g2_x
    }
}

/// Monomial points read from a transcript directory.
#[derive(Debug, Clone)]
pub struct FileReferenceString {
    monomials: Arc<Vec<G1Affine>>,
}

impl FileReferenceString {
    /// Load the first `num_points` points from `path`.
    pub fn new<P: AsRef<Path>>(num_points: usize, path: P) -> Result<Self> {
        Ok(Self {
            monomials: Arc::new(read_transcript_g1(num_points, path)?),
        })
    }
}

impl ProverReferenceString for FileReferenceString {
    fn get_monomial_points(&self) -> Arc<Vec<G1Affine>> {
        self.monomials.clone()
    }

    fn get_monomial_size(&self) -> usize {
        self.monomials.len()
    }
}

/// Reads the transcript files afresh for every request.
#[derive(Debug, Clone)]
pub struct FileReferenceStringFactory {
    path: PathBuf,
}

impl FileReferenceStringFactory {
    /// Factory over the transcript directory `path`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl ReferenceStringFactory for FileReferenceStringFactory {
    fn get_prover_crs(&self, degree: usize) -> Result<Arc<dyn ProverReferenceString>> {
        Ok(Arc::new(FileReferenceString::new(degree, &self.path)?))
    }

    fn get_verifier_crs(&self) -> Result<Arc<dyn VerifierReferenceString>> {
        Ok(Arc::new(VerifierFileReferenceString::new(&self.path)?))
    }
}

/// Keeps the largest prover string loaded so far and only rereads the files when a bigger one
/// is requested.
#[derive(Debug)]
pub struct DynamicFileReferenceStringFactory {
    path: PathBuf,
    prover_crs: RwLock<Arc<FileReferenceString>>,
    verifier_crs: Arc<VerifierFileReferenceString>,
}

impl DynamicFileReferenceStringFactory {
    /// Load `initial_degree` points up front.
    pub fn new<P: Into<PathBuf>>(path: P, initial_degree: usize) -> Result<Self> {
        let path = path.into();
        let verifier_crs = Arc::new(VerifierFileReferenceString::new(&path)?);
        let prover_crs = RwLock::new(Arc::new(FileReferenceString::new(initial_degree, &path)?));
        Ok(Self {
            path,
            prover_crs,
            verifier_crs,
        })
    }
}

impl ReferenceStringFactory for DynamicFileReferenceStringFactory {
    fn get_prover_crs(&self, degree: usize) -> Result<Arc<dyn ProverReferenceString>> {
        {
            let current = self
                .prover_crs
                .read()
                .map_err(|_| anyhow!("reference string lock poisoned"))?;
            if current.get_monomial_size() >= degree {
                return Ok(current.clone());
            }
        }
        let loaded = Arc::new(FileReferenceString::new(degree, &self.path)?);
        *self
            .prover_crs
            .write()
            .map_err(|_| anyhow!("reference string lock poisoned"))? = loaded.clone();
        Ok(loaded)
    }

    fn get_verifier_crs(&self) -> Result<Arc<dyn VerifierReferenceString>> {
        Ok(self.verifier_crs.clone())
    }
}
