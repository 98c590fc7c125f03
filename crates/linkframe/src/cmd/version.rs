use linkframe_frame::{CRC8_GENERATOR, ESCAPE, START, STOP, SUB_FRAME_SIZE};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("linkframe {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: linkframe");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "wire: start={:?} stop={:?} escape={:?} sub_frame={SUB_FRAME_SIZE} crc8_generator=0x{CRC8_GENERATOR:03x}",
        START as char, STOP as char, ESCAPE as char
    );
    println!("features: async={}, cli=true", cfg!(feature = "async"));

    Ok(SUCCESS)
}
