mod builtin;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use builtin::builtin_boards;

/// The logical hardware function a pin is claimed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PinRole {
    DigitalInput,
    DigitalOutput,
    Pwm,
    Servo,
    AnalogInput,
    Serial,
    I2c,
    Spi,
}

impl PinRole {
    pub const ALL: [PinRole; 8] = [
        PinRole::DigitalInput,
        PinRole::DigitalOutput,
        PinRole::Pwm,
        PinRole::Servo,
        PinRole::AnalogInput,
        PinRole::Serial,
        PinRole::I2c,
        PinRole::Spi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PinRole::DigitalInput => "digital-input",
            PinRole::DigitalOutput => "digital-output",
            PinRole::Pwm => "pwm",
            PinRole::Servo => "servo",
            PinRole::AnalogInput => "analog-input",
            PinRole::Serial => "serial",
            PinRole::I2c => "i2c",
            PinRole::Spi => "spi",
        }
    }
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PinRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PinRole::ALL
            .into_iter()
            .find(|role| role.name() == s)
            .ok_or_else(|| format!("unknown pin role '{}'", s))
    }
}

/// Pin capabilities of one target board.
///
/// Pin identifiers are board-specific strings ("9", "A0", "Serial1"); a pin
/// may appear in several sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub digital_pins: Vec<String>,
    #[serde(default)]
    pub pwm_pins: Vec<String>,
    #[serde(default)]
    pub analog_pins: Vec<String>,
    #[serde(default)]
    pub serial_pins: Vec<String>,
    #[serde(default)]
    pub i2c_pins: Vec<String>,
    #[serde(default)]
    pub spi_pins: Vec<String>,
}

impl BoardProfile {
    /// Look up a built-in board by name (case-insensitive).
    pub fn builtin(name: &str) -> Option<BoardProfile> {
        builtin_boards()
            .into_iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// The set of pins eligible for `role` on this board.
    pub fn eligible_pins(&self, role: PinRole) -> &[String] {
        match role {
            PinRole::DigitalInput | PinRole::DigitalOutput => &self.digital_pins,
            PinRole::Pwm | PinRole::Servo => &self.pwm_pins,
            PinRole::AnalogInput => &self.analog_pins,
            PinRole::Serial => &self.serial_pins,
            PinRole::I2c => &self.i2c_pins,
            PinRole::Spi => &self.spi_pins,
        }
    }

    pub fn supports(&self, role: PinRole, pin: &str) -> bool {
        self.eligible_pins(role).iter().any(|p| p == pin)
    }
}
