use recordio_frame::{FrameLayout, MAGIC};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("recordio {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: recordio");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("RECORDIO_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("magic: {MAGIC:#010x}");
    println!(
        "native_header_bytes: {}",
        FrameLayout::Native.header_size()
    );
    println!(
        "portable_header_bytes: {}",
        FrameLayout::Portable.header_size()
    );
    println!("features: message={}, cli=true", cfg!(feature = "message"));

    Ok(SUCCESS)
}
