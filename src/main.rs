use ensemble_survey::{
    run_survey, ArtifactWriter, LogSink, ModemTransport, Nm3SerialModem, SurveyConfig,
    RUN_LOG_FILE,
};
use std::env;
use std::process;

fn main() {
    let config = match env::args().nth(1) {
        Some(path) => match SurveyConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => SurveyConfig::default(),
    };

    println!("Ensemble Survey");
    println!(" Port={} Baud={}", config.port, config.baud_rate);
    println!(" Local Address={:03}", config.local_address);

    let mut modem = match Nm3SerialModem::open(&config.port, config.baud_rate) {
        Ok(modem) => modem,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    set_address(&mut modem, config.local_address);

    let log = LogSink::new(config.output_dir.join(RUN_LOG_FILE));
    let writer = ArtifactWriter::new(config.output_dir.clone(), log);

    println!("Channel Impulse Response");
    match run_survey(
        &mut modem,
        &config.remote_addresses,
        config.capture_mode,
        &writer,
    ) {
        Ok(summary) => {
            println!(
                "Survey complete: {} attempted, {} captured, {} failed",
                summary.attempted, summary.captured, summary.failed
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// $A - assign the local modem's short-address, reporting status before and after
fn set_address(modem: &mut dyn ModemTransport, new_address: u8) {
    println!("Set Address");

    print_status(modem);

    match modem.set_address(new_address) {
        Ok(address) => println!(" Set Modem Address={:03}", address),
        Err(e) => println!(" Error: {}", e),
    }

    print_status(modem);
}

/// $? - query and print the local modem's status
fn print_status(modem: &mut dyn ModemTransport) {
    println!("  Query Current Status");
    match modem.query_status() {
        Ok(status) => {
            println!(" Modem Address={:03}", status.address);
            println!(" Battery Voltage={:.2}V", status.battery_volts);
            println!(" Version={}", status.firmware_version);
            println!(" Build Date={}", status.build_date);
        }
        Err(e) => println!(" Error: {}", e),
    }
}
