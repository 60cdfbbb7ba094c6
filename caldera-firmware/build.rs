//! Build script for caldera-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates boiler.toml at compile time
//! - Emits the validated board configuration as Rust constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    let config = load_config();
    let board = validate_config(&config);
    write_board_config(&board);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated board configuration
struct Board {
    thermistor_pin: i64,
    relay_pin: i64,
    relay_inverted: bool,
    enable_pin: i64,
    enable_inverted: bool,
    reset_pin: i64,
    settle_ms: i64,
    tick_interval_ms: i64,
    diagnostics_enabled: bool,
    diagnostics_interval_ms: i64,
    calibration: Vec<(i64, i64)>,
}

/// Read and parse boiler.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=boiler.toml");

    let config_path = Path::new("boiler.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: boiler.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a boiler.toml board configuration in      ║\n\
            ║  the caldera-firmware directory.                                 ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read boiler.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in boiler.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with a list of configuration errors
fn fail(errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid configuration in boiler.toml                     ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Fetch `[section] key`, recording an error if it is missing or mistyped
fn get<'a>(
    config: &'a toml::Value,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::Value> {
    let value = config.get(section).and_then(|s| s.get(key));
    if value.is_none() {
        errors.push(format!("[{}] missing '{}'", section, key));
    }
    value
}

fn get_int(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> i64 {
    match get(config, section, key, errors) {
        Some(toml::Value::Integer(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] '{}' must be an integer", section, key));
            0
        }
        None => 0,
    }
}

fn get_bool(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> bool {
    match get(config, section, key, errors) {
        Some(toml::Value::Boolean(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] '{}' must be true or false", section, key));
            false
        }
        None => false,
    }
}

fn check_range(value: i64, lo: i64, hi: i64, what: &str, errors: &mut Vec<String>) {
    if value < lo || value > hi {
        errors.push(format!("{} must be {}-{}", what, lo, hi));
    }
}

/// Validate every section and collect the values
fn validate_config(config: &toml::Value) -> Board {
    let mut errors = Vec::new();

    let board = Board {
        thermistor_pin: get_int(config, "pins", "thermistor", &mut errors),
        relay_pin: get_int(config, "pins", "relay", &mut errors),
        relay_inverted: get_bool(config, "pins", "relay_inverted", &mut errors),
        enable_pin: get_int(config, "pins", "enable", &mut errors),
        enable_inverted: get_bool(config, "pins", "enable_inverted", &mut errors),
        reset_pin: get_int(config, "pins", "reset_button", &mut errors),
        settle_ms: get_int(config, "sensor", "settle_ms", &mut errors),
        tick_interval_ms: get_int(config, "control", "tick_interval_ms", &mut errors),
        diagnostics_enabled: get_bool(config, "diagnostics", "enabled", &mut errors),
        diagnostics_interval_ms: get_int(config, "diagnostics", "interval_ms", &mut errors),
        calibration: validate_calibration(config, &mut errors),
    };

    // Only GPIO26-29 are wired to the ADC
    check_range(board.thermistor_pin, 26, 29, "[pins] thermistor", &mut errors);
    check_range(board.relay_pin, 0, 29, "[pins] relay", &mut errors);
    check_range(board.enable_pin, 0, 29, "[pins] enable", &mut errors);
    check_range(board.reset_pin, 0, 29, "[pins] reset_button", &mut errors);

    let pins = [
        board.thermistor_pin,
        board.relay_pin,
        board.enable_pin,
        board.reset_pin,
    ];
    for (i, pin) in pins.iter().enumerate() {
        if pins[..i].contains(pin) {
            errors.push(format!("[pins] GPIO{} is assigned twice", pin));
        }
    }

    check_range(board.settle_ms, 0, 1_000, "[sensor] settle_ms", &mut errors);
    check_range(
        board.tick_interval_ms,
        1,
        60_000,
        "[control] tick_interval_ms",
        &mut errors,
    );
    check_range(
        board.diagnostics_interval_ms,
        1,
        3_600_000,
        "[diagnostics] interval_ms",
        &mut errors,
    );

    if !errors.is_empty() {
        fail(&errors);
    }

    println!("cargo:warning=boiler.toml validated successfully");
    board
}

/// Validate the calibration breakpoints
fn validate_calibration(config: &toml::Value, errors: &mut Vec<String>) -> Vec<(i64, i64)> {
    let entries = match config.get("calibration") {
        Some(toml::Value::Array(entries)) => entries,
        Some(_) => {
            errors.push("[[calibration]] must be an array of tables".to_string());
            return Vec::new();
        }
        None => {
            errors.push("Missing [[calibration]] breakpoints".to_string());
            return Vec::new();
        }
    };

    let mut points = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let raw = entry.get("raw").and_then(|v| v.as_integer());
        let temp = entry.get("temperature").and_then(|v| v.as_integer());

        match (raw, temp) {
            (Some(raw), Some(temp)) => {
                let range = i32::MIN as i64..=i32::MAX as i64;
                if !range.contains(&raw) || !range.contains(&temp) {
                    errors.push(format!("[[calibration]] {} out of i32 range", i));
                }
                points.push((raw, temp));
            }
            _ => errors.push(format!(
                "[[calibration]] {} needs integer 'raw' and 'temperature'",
                i
            )),
        }
    }

    if points.len() < 2 {
        errors.push("[[calibration]] needs at least two breakpoints".to_string());
    }

    for i in 1..points.len() {
        if points[i].0 <= points[i - 1].0 {
            errors.push(format!(
                "[[calibration]] {} raw must be above the previous point",
                i
            ));
        }
    }

    points
}

/// Write board_config.rs into OUT_DIR
fn write_board_config(board: &Board) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut out = String::new();

    out.push_str("// Generated by build.rs from boiler.toml\n\n");

    let consts = [
        ("SETTLE_MS", "u32", board.settle_ms.to_string()),
        ("TICK_INTERVAL_MS", "u32", board.tick_interval_ms.to_string()),
        ("RELAY_INVERTED", "bool", board.relay_inverted.to_string()),
        ("ENABLE_INVERTED", "bool", board.enable_inverted.to_string()),
        ("DIAGNOSTICS_ENABLED", "bool", board.diagnostics_enabled.to_string()),
        (
            "DIAGNOSTICS_INTERVAL_MS",
            "u32",
            board.diagnostics_interval_ms.to_string(),
        ),
    ];
    for (name, ty, value) in consts {
        out.push_str(&format!("pub const {}: {} = {};\n", name, ty, value));
    }

    out.push_str("\npub const CALIBRATION_POINTS: &[Breakpoint] = &[\n");
    for (raw, temp) in &board.calibration {
        out.push_str(&format!("    Breakpoint::new({}, {}),\n", raw, temp));
    }
    out.push_str("];\n\n");

    let pins = [
        ("thermistor_pin", board.thermistor_pin),
        ("relay_pin", board.relay_pin),
        ("enable_pin", board.enable_pin),
        ("reset_pin", board.reset_pin),
    ];
    for (name, pin) in pins {
        out.push_str(&format!(
            "macro_rules! {} {{\n    ($p:ident) => {{\n        $p.PIN_{}\n    }};\n}}\n\n",
            name, pin
        ));
    }

    fs::write(out_dir.join("board_config.rs"), out).unwrap();
}
