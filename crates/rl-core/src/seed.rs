//! Seed validation, generation and persistence.
//!
//! A run's seed is resolved once (parsed from caller text or freshly drawn),
//! written to a [`SeedStore`], and only then turned into an [`RngHandle`].
//! [`CommittedSeed`] can only be obtained from [`SeedManager::commit`], so a
//! run that holds one has already persisted its seed.

use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{codes, ErrorInfo, RlError};
use crate::rng::RngHandle;

const DEFAULT_MIN_DIGITS: usize = 6;
/// Digits of `u64::MAX`.
const MAX_SEED_DIGITS: usize = 20;

/// Validated run seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(u64);

impl Seed {
    /// Wraps a raw integer without applying any policy.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw integer value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Number of decimal digits in the seed.
    pub fn digits(&self) -> usize {
        self.0.to_string().len()
    }
}

impl Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn invalid_seed(text: &str, message: impl Into<String>) -> RlError {
    RlError::Seed(ErrorInfo::new(codes::INVALID_SEED, message).with_context("input", text))
}

/// Acceptance policy for seeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Minimum number of decimal digits; `0` disables the length check.
    #[serde(default = "default_min_digits")]
    pub min_digits: usize,
}

fn default_min_digits() -> usize {
    DEFAULT_MIN_DIGITS
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            min_digits: default_min_digits(),
        }
    }
}

impl SeedPolicy {
    /// Policy accepting any non-negative integer.
    pub fn relaxed() -> Self {
        Self { min_digits: 0 }
    }

    /// Parses integer-like text into a seed and applies the policy.
    pub fn parse(&self, text: &str) -> Result<Seed, RlError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(invalid_seed(text, "seed is empty"));
        }
        match trimmed.parse::<u64>() {
            Ok(value) => self.validate(Seed::new(value)),
            Err(_) if trimmed.parse::<i128>().is_ok() => Err(invalid_seed(
                text,
                "seed must be a non-negative integer that fits in 64 bits",
            )),
            Err(err) => Err(RlError::Seed(
                ErrorInfo::new(codes::INVALID_SEED, format!("seed is not an integer: {err}"))
                    .with_context("input", text)
                    .with_hint("use digits only, e.g. 123456"),
            )),
        }
    }

    /// Applies the digit-count policy to an already numeric seed.
    pub fn validate(&self, seed: Seed) -> Result<Seed, RlError> {
        if seed.digits() < self.min_digits {
            return Err(RlError::Seed(
                ErrorInfo::new(
                    codes::INVALID_SEED,
                    format!("seed must have at least {} digits", self.min_digits),
                )
                .with_context("input", seed.to_string())
                .with_context("digits", seed.digits().to_string()),
            ));
        }
        Ok(seed)
    }

    /// Draws a fresh seed from OS entropy that satisfies the policy.
    ///
    /// Fails when the digit floor is beyond what a 64-bit seed can hold.
    pub fn generate(&self) -> Result<Seed, RlError> {
        if self.min_digits > MAX_SEED_DIGITS {
            return Err(RlError::Seed(
                ErrorInfo::new(
                    codes::INVALID_SEED,
                    format!("no 64-bit seed has at least {} digits", self.min_digits),
                )
                .with_context("min_digits", self.min_digits.to_string())
                .with_hint(format!("use a minimum of at most {MAX_SEED_DIGITS} digits")),
            ));
        }
        let digits = self.min_digits.max(DEFAULT_MIN_DIGITS) as u32;
        let low = 10u64.pow(digits - 1);
        let high = if digits as usize == MAX_SEED_DIGITS {
            u64::MAX
        } else {
            10u64.pow(digits) - 1
        };
        Ok(Seed::new(rand::thread_rng().gen_range(low..=high)))
    }
}

/// Durable location for the run seed.
pub trait SeedStore {
    /// Reads the stored seed, `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Seed>, RlError>;

    /// Writes the seed durably.
    fn persist(&mut self, seed: Seed) -> Result<(), RlError>;
}

/// Stores the decimal text of the seed in a single file.
#[derive(Debug, Clone)]
pub struct FileSeedStore {
    path: PathBuf,
    overwrite: bool,
}

impl FileSeedStore {
    /// Store at `path` that refuses to replace a different stored seed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            overwrite: false,
        }
    }

    /// Allows replacing a previously stored, different seed.
    pub fn overwriting(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Location of the seed file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeedStore for FileSeedStore {
    fn load(&self) -> Result<Option<Seed>, RlError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path).map_err(|err| {
            RlError::Seed(
                ErrorInfo::new(codes::SEED_IO, err.to_string())
                    .with_context("path", self.path.display().to_string()),
            )
        })?;
        SeedPolicy::relaxed().parse(&text).map(Some).map_err(|err| {
            RlError::Seed(
                err.info()
                    .clone()
                    .with_context("path", self.path.display().to_string()),
            )
        })
    }

    fn persist(&mut self, seed: Seed) -> Result<(), RlError> {
        if let Some(existing) = self.load()? {
            if existing != seed {
                if !self.overwrite {
                    return Err(RlError::Seed(
                        ErrorInfo::new(
                            codes::SEED_CONFLICT,
                            "seed file already holds a different seed",
                        )
                        .with_context("path", self.path.display().to_string())
                        .with_context("stored", existing.to_string())
                        .with_context("requested", seed.to_string())
                        .with_hint("reuse the stored seed or allow overwriting"),
                    ));
                }
                warn!(
                    path = %self.path.display(),
                    stored = %existing,
                    requested = %seed,
                    "overwriting stored seed"
                );
            }
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                RlError::Seed(
                    ErrorInfo::new(codes::SEED_IO, err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        fs::write(&self.path, format!("{seed}\n")).map_err(|err| {
            RlError::Seed(
                ErrorInfo::new(codes::SEED_IO, err.to_string())
                    .with_context("path", self.path.display().to_string()),
            )
        })?;
        debug!(path = %self.path.display(), %seed, "seed written");
        Ok(())
    }
}

/// Process-local store, mostly for library callers and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySeedStore {
    seed: Option<Seed>,
}

impl SeedStore for MemorySeedStore {
    fn load(&self) -> Result<Option<Seed>, RlError> {
        Ok(self.seed)
    }

    fn persist(&mut self, seed: Seed) -> Result<(), RlError> {
        self.seed = Some(seed);
        Ok(())
    }
}

/// Seed that has been written to its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedSeed {
    seed: Seed,
}

impl CommittedSeed {
    /// The persisted seed.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Opens the single RNG stream for the run.
    pub fn open_rng(&self) -> RngHandle {
        RngHandle::from_seed(self.seed.value())
    }
}

/// Resolves, validates and persists the run seed.
#[derive(Debug)]
pub struct SeedManager<S: SeedStore> {
    store: S,
    policy: SeedPolicy,
}

impl<S: SeedStore> SeedManager<S> {
    /// Manager writing to `store` and validating with `policy`.
    pub fn new(store: S, policy: SeedPolicy) -> Self {
        Self { store, policy }
    }

    /// Active acceptance policy.
    pub fn policy(&self) -> &SeedPolicy {
        &self.policy
    }

    /// Parses the candidate when given, otherwise draws a fresh seed.
    pub fn resolve(&self, candidate: Option<&str>) -> Result<Seed, RlError> {
        match candidate {
            Some(text) => self.policy.parse(text),
            None => {
                let seed = self.policy.generate()?;
                info!(%seed, "generated seed");
                Ok(seed)
            }
        }
    }

    /// Persists the seed; the returned token opens the run RNG.
    pub fn commit(&mut self, seed: Seed) -> Result<CommittedSeed, RlError> {
        let seed = self.policy.validate(seed)?;
        self.store.persist(seed)?;
        info!(%seed, "seed committed");
        Ok(CommittedSeed { seed })
    }

    /// Previously persisted seed, if any.
    pub fn recall(&self) -> Result<Option<Seed>, RlError> {
        self.store.load()
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
