use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use labyrinth_system_diffusion::DiffusionTuning;
use labyrinth_system_generation::GenerationTuning;
use labyrinth_world::Config;
use serde::{Deserialize, Serialize};

const CODE_DOMAIN: &str = "labyrinth";
const CODE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded maze payload.
pub(crate) const CODE_HEADER: &str = "labyrinth:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Everything needed to regenerate a maze on another machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct MazeCode {
    /// Number of maze rows.
    pub(crate) rows: u32,
    /// Number of maze columns.
    pub(crate) columns: u32,
    /// Seed feeding maze generation.
    pub(crate) seed: u64,
    /// Carve actions granted at session start.
    pub(crate) carve_actions: u32,
    /// Classification probabilities.
    pub(crate) generation: GenerationTuning,
    /// Diffusion tuning.
    pub(crate) diffusion: DiffusionTuning,
}

impl MazeCode {
    /// Captures the reproducible parts of a configuration.
    pub(crate) fn from_config(config: &Config) -> Self {
        Self {
            rows: config.rows,
            columns: config.columns,
            seed: config.seed,
            carve_actions: config.carve_actions,
            generation: config.generation,
            diffusion: config.diffusion,
        }
    }

    /// Overwrites the matching configuration fields.
    pub(crate) fn apply_to(&self, config: &mut Config) {
        config.rows = self.rows;
        config.columns = self.columns;
        config.seed = self.seed;
        config.carve_actions = self.carve_actions;
        config.generation = self.generation;
        config.diffusion = self.diffusion;
    }

    /// Encodes the maze into a single-line string suitable for sharing.
    pub(crate) fn encode(&self) -> Result<String, MazeTransferError> {
        let payload = SerializablePayload {
            seed: self.seed,
            carve_actions: self.carve_actions,
            generation: self.generation,
            diffusion: self.diffusion,
        };
        let json = serde_json::to_vec(&payload).map_err(MazeTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!("{CODE_HEADER}:{}x{}:{encoded}", self.rows, self.columns))
    }

    /// Decodes a maze code from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, MazeTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(MazeTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(MazeTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(MazeTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(MazeTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(MazeTransferError::MissingPayload)?;

        if domain != CODE_DOMAIN {
            return Err(MazeTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != CODE_VERSION {
            return Err(MazeTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (rows, columns) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(MazeTransferError::InvalidEncoding)?;
        let decoded: SerializablePayload =
            serde_json::from_slice(&bytes).map_err(MazeTransferError::InvalidPayload)?;

        Ok(Self {
            rows,
            columns,
            seed: decoded.seed,
            carve_actions: decoded.carve_actions,
            generation: decoded.generation,
            diffusion: decoded.diffusion,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializablePayload {
    seed: u64,
    carve_actions: u32,
    generation: GenerationTuning,
    diffusion: DiffusionTuning,
}

/// Errors that can occur while encoding or decoding maze codes.
#[derive(Debug)]
pub(crate) enum MazeTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the maze code.
    MissingPrefix,
    /// The maze code did not contain a version segment.
    MissingVersion,
    /// The maze code did not include grid dimensions.
    MissingDimensions,
    /// The maze code did not include the payload segment.
    MissingPayload,
    /// The maze code used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The maze code used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the maze code.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for MazeTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "maze code was empty"),
            Self::MissingPrefix => write!(f, "maze code is missing the prefix"),
            Self::MissingVersion => write!(f, "maze code is missing the version"),
            Self::MissingDimensions => write!(f, "maze code is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "maze code is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "maze code prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "maze code version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode maze payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not process maze payload: {error}")
            }
        }
    }
}

impl Error for MazeTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), MazeTransferError> {
    let invalid = || MazeTransferError::InvalidDimensions(dimensions.to_owned());
    let (rows, columns) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;

    if rows == 0 || columns == 0 {
        return Err(invalid());
    }

    Ok((rows, columns))
}
