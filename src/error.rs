// Copyright (C) 2024, NTNU
// Author: Jarle Vinje Kramer <jarlekramer@gmail.com; jarle.a.kramer@ntnu.no>
// License: GPL v3.0 (see separate file LICENSE or https://www.gnu.org/licenses/gpl-3.0.html)


//! An implementation of a common error type that is used throughout the library.

use serde_json;
use std::fmt;

#[derive(Debug)]
/// A common error type intended to represent the various errors that can occur while using this
/// library.
pub enum Error {
    /// Interface to the standard library IO error
    IoError(std::io::Error),
    /// Interface to the Serde JSON error
    SerdeJsonError(serde_json::Error),
    /// Invalid configuration input: unknown or missing keys, out-of-range values, length
    /// mismatches or unknown model names
    ConfigError(String),
    /// A numerical precondition was violated at runtime
    DomainError(String),
    /// A result was requested while the flow field is not in a readable state
    StateError(String),
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IoError(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerdeJsonError(error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IoError(error) => write!(f, "IO error: {}", error),
            Error::SerdeJsonError(error) => write!(f, "Serde JSON error: {}", error),
            Error::ConfigError(message) => write!(f, "Configuration error: {}", message),
            Error::DomainError(message) => write!(f, "Domain error: {}", message),
            Error::StateError(message) => write!(f, "State error: {}", message),
        }
    }
}

impl std::error::Error for Error {}
