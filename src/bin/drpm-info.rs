use std::error::Error;

use anyhow::{Context, Result};
use argh::FromArgs;

use drpm::record::{DeltaType, Head};

#[derive(FromArgs, Debug)]
/// Read a deltarpm (.drpm) file and print its parsed fields.
struct Args {
    /// path to the .drpm file to read
    #[argh(positional)]
    path: String,

    /// raise the log level to debug
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Args = argh::from_env();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let record = drpm::read(&args.path).context(format!("failed to read {:?}", args.path))?;
    let info = drpm::project(&record).context("failed to project parsed record")?;

    println!("file:              {}", args.path);
    println!("type:              {:?}", info.type_);
    println!("version:           {}", info.version);
    println!("comp:              {}", info.comp);
    println!("tgt_comp:          {} (level {})", info.tgt_comp, record.tgt_comp_level);
    println!("tgt_size:          {}", info.tgt_size);
    println!("tgt_header_len:    {}", info.tgt_header_len);
    println!("tgt_nevr:          {}", String::from_utf8_lossy(&info.tgt_nevr));
    println!("src_nevr:          {}", String::from_utf8_lossy(&record.src_nevr));
    println!("sequence:          {}", info.sequence_hex);
    println!("tgt_md5:           {}", info.tgt_md5_hex);
    println!("payload_fmt_off:   {}", info.payload_fmt_off);
    println!("offadj_elems:      {} words", info.offadj_elems_word_count);
    println!("int_copies:        {} words", info.int_copies_word_count);
    println!("ext_copies:        {} words", info.ext_copies_word_count);
    println!("ext_data_len:      {}", info.ext_data_len);
    println!("int_data_len:      {}", info.int_data_len);

    match &record.head {
        Head::Rpm(_) => println!("head:              rpm handle (standard framing)"),
        Head::Nevr(nevr) => println!("head:              {} (rpm-only framing)", String::from_utf8_lossy(nevr)),
    }

    if record.type_ == DeltaType::RpmOnly && record.add_data.is_empty() {
        log::debug!("rpm-only delta carries no additional data");
    }

    Ok(())
}
