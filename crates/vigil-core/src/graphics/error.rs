// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

/// Failures that can occur while probing the host's graphics capability.
///
/// These never cross the probe boundary: the prober folds them into
/// `CapabilitySnapshot::error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// No adapter could be obtained for any attempted feature level.
    NoAdapter(String),
    /// An adapter was found but a throwaway device could not be created on it.
    DeviceCreation(String),
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::NoAdapter(msg) => {
                write!(f, "No usable graphics adapter: {msg}")
            }
            ProbeError::DeviceCreation(msg) => {
                write!(f, "Failed to create a probe device: {msg}")
            }
            ProbeError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for ProbeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_error_display() {
        let err = ProbeError::NoAdapter("attempted [Extended, Baseline]".to_string());
        assert_eq!(
            format!("{err}"),
            "No usable graphics adapter: attempted [Extended, Baseline]"
        );

        let err = ProbeError::DeviceCreation("out of memory".to_string());
        assert_eq!(
            format!("{err}"),
            "Failed to create a probe device: out of memory"
        );
    }
}
