/*!
config.rs - Power-up configuration.

Two conventions exist for the initial CPU state:

- `Nestest`: the state the nestest golden log starts from (P=$24).
- `Hardware`: the documented 2A03 power-up (P=$34) including APU register
  clearing and RAM fill.

Both leave SP=$FD, A/X/Y=0 and start the cycle counter at 7 (reset cost).
`entry_point` overrides the reset vector; nestest's automated mode starts at
$C000 while its vector points at the interactive menu.
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpConvention {
    #[default]
    Nestest,
    Hardware,
}

impl PowerUpConvention {
    /// Initial value of the P register.
    pub fn initial_status(self) -> u8 {
        match self {
            PowerUpConvention::Nestest => 0x24,
            PowerUpConvention::Hardware => 0x34,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpConfig {
    #[serde(default)]
    pub convention: PowerUpConvention,
    #[serde(default)]
    pub entry_point: Option<u16>,
}

impl PowerUpConfig {
    pub const INITIAL_SP: u8 = 0xFD;
    pub const RESET_CYCLES: u64 = 7;

    pub fn nestest(entry_point: u16) -> Self {
        Self {
            convention: PowerUpConvention::Nestest,
            entry_point: Some(entry_point),
        }
    }

    pub fn hardware() -> Self {
        Self {
            convention: PowerUpConvention::Hardware,
            entry_point: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_nestest_via_reset_vector() {
        let c = PowerUpConfig::default();
        assert_eq!(c.convention, PowerUpConvention::Nestest);
        assert_eq!(c.entry_point, None);
        assert_eq!(c.convention.initial_status(), 0x24);
        assert_eq!(PowerUpConvention::Hardware.initial_status(), 0x34);
    }

    #[test]
    fn deserializes_from_json() {
        let c: PowerUpConfig =
            serde_json::from_str(r#"{"convention":"hardware","entry_point":49152}"#).unwrap();
        assert_eq!(c.convention, PowerUpConvention::Hardware);
        assert_eq!(c.entry_point, Some(0xC000));

        let c: PowerUpConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, PowerUpConfig::default());
    }
}
