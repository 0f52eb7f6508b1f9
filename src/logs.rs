use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use anyhow::Result;
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    {ContentLimit, FileRotate},
};
use log::{Log, Metadata, Record};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

const LOG_FILE_NAME: &str = "main.log";

fn log_folder(cache_dir: &str) -> PathBuf {
    Path::new(cache_dir).join("logs")
}

/// Writes every record into a rotating file and mirrors it to stderr, where
/// the shell's debug console picks it up.
struct TourLogger {
    file: WriteLogger<FileRotate<AppendTimestamp>>,
}

impl Log for TourLogger {
    // `log::max_level` is the only filter, see `set_level`
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.file.log(record);
        eprintln!(
            "{} [{}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        self.file.flush();
    }
}

/// Installs the process wide logger. Only the first call can succeed.
pub fn init(cache_dir: &str, level: LevelFilter) -> Result<()> {
    let folder = log_folder(cache_dir);
    fs::create_dir_all(&folder)?;
    // keeps 3 old files of 1000 lines next to the current one
    let file = FileRotate::new(
        folder.join(LOG_FILE_NAME),
        AppendTimestamp::default(FileLimit::MaxFiles(3)),
        ContentLimit::Lines(1000),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let file = *WriteLogger::new(LevelFilter::Trace, config, file);
    log::set_boxed_logger(Box::new(TourLogger { file }))?;
    set_level(level);
    Ok(())
}

pub fn set_level(level: LevelFilter) {
    log::set_max_level(level);
    info!("log level: {}", level);
}

/// Zips all log files, current and rotated, into `target_file_path`.
pub fn export(cache_dir: &str, target_file_path: &str) -> Result<()> {
    log::logger().flush();
    let mut zip = zip::ZipWriter::new(File::create(target_file_path)?);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    let mut paths: Vec<PathBuf> = fs::read_dir(log_folder(cache_dir))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();
    for path in paths {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        zip.start_file(format!("logs/{}", file_name), options)?;
        io::copy(&mut File::open(&path)?, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}
