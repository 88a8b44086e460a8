use super::BoardProfile;

fn pins(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn numbered(range: std::ops::RangeInclusive<u32>) -> Vec<String> {
    range.map(|n| n.to_string()).collect()
}

fn analog(count: u32) -> Vec<String> {
    (0..count).map(|n| format!("A{}", n)).collect()
}

fn uno() -> BoardProfile {
    let mut digital = numbered(0..=13);
    digital.extend(analog(6));
    BoardProfile {
        name: "uno".to_string(),
        description: "Arduino Uno".to_string(),
        digital_pins: digital,
        pwm_pins: pins(&["3", "5", "6", "9", "10", "11"]),
        analog_pins: analog(6),
        serial_pins: pins(&["Serial"]),
        i2c_pins: pins(&["A4", "A5"]),
        spi_pins: pins(&["10", "11", "12", "13"]),
    }
}

fn nano() -> BoardProfile {
    // A6 and A7 are analog-only on the Nano.
    BoardProfile {
        name: "nano".to_string(),
        description: "Arduino Nano".to_string(),
        analog_pins: analog(8),
        ..uno()
    }
}

fn mega() -> BoardProfile {
    let mut digital = numbered(0..=53);
    digital.extend(analog(16));
    let mut pwm = numbered(2..=13);
    pwm.extend(numbered(44..=46));
    BoardProfile {
        name: "mega".to_string(),
        description: "Arduino Mega 2560".to_string(),
        digital_pins: digital,
        pwm_pins: pwm,
        analog_pins: analog(16),
        serial_pins: pins(&["Serial", "Serial1", "Serial2", "Serial3"]),
        i2c_pins: pins(&["20", "21"]),
        spi_pins: pins(&["50", "51", "52", "53"]),
    }
}

fn leonardo() -> BoardProfile {
    let mut digital = numbered(0..=13);
    digital.extend(analog(6));
    BoardProfile {
        name: "leonardo".to_string(),
        description: "Arduino Leonardo".to_string(),
        digital_pins: digital,
        pwm_pins: pins(&["3", "5", "6", "9", "10", "11", "13"]),
        analog_pins: analog(6),
        serial_pins: pins(&["Serial", "Serial1"]),
        i2c_pins: pins(&["2", "3"]),
        // SPI is only broken out on the ICSP header.
        spi_pins: Vec::new(),
    }
}

/// All boards known without user configuration.
pub fn builtin_boards() -> Vec<BoardProfile> {
    vec![uno(), nano(), mega(), leonardo()]
}
