use std::cell::Cell;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info, warn};

use crate::config::UserConfig;
use crate::data::history::HistoryLine;
use crate::errors::{Error, Result};
use crate::pipeline::tag_history_lines;

use super::jsonl_sink::JsonlSink;
use super::parse_osm::OsmHistoryReader;
use super::Etl;

pub const ETL_NAME: &str = "tag_history";

const PROGRESS_LOG_INTERVAL: u64 = 1000;

/// Reads a full-history export and writes the tracked tag history of every
/// element as JSONL.
///
/// The whole run is one lazy pass: `transform` only wires up the pipeline and
/// `load` drives it, so memory stays bounded by the longest element history.
/// Lines go to `<output>.partial` first and the file is renamed into place only
/// once every line is flushed, so an aborted run never looks cached.
pub struct TagHistoryEtl<'a> {
    config: &'a UserConfig,
    elements_read: Rc<Cell<u64>>,
}

impl TagHistoryEtl<'_> {
    pub fn new(config: &UserConfig) -> TagHistoryEtl {
        TagHistoryEtl {
            config,
            elements_read: Rc::new(Cell::new(0)),
        }
    }

    /// Elements the reader handed to the pipeline during the last run.
    pub fn elements_read(&self) -> u64 {
        self.elements_read.get()
    }

    fn output_path(&self) -> &Path {
        Path::new(&self.config.output_path)
    }

    fn partial_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.partial", self.config.output_path))
    }

    fn write_lines(&self, path: &Path, output: Box<dyn Iterator<Item = Result<HistoryLine>>>) -> Result<u64> {
        let mut sink = JsonlSink::create(path)?;

        for line in tqdm::tqdm(output) {
            sink.write_line(&line?)?;
            if sink.lines_written() % PROGRESS_LOG_INTERVAL == 0 {
                debug!(etl_name = ETL_NAME, lines = sink.lines_written(); "Outputted history lines");
            }
        }

        let lines = sink.lines_written();
        sink.finish()?;
        Ok(lines)
    }
}

impl Etl for TagHistoryEtl<'_> {
    type Input = OsmHistoryReader<Box<dyn BufRead>>;
    type Output = Box<dyn Iterator<Item = Result<HistoryLine>>>;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn is_cached(&self) -> Result<bool> {
        Ok(self.output_path().try_exists()?)
    }

    fn clean(&self) -> Result<()> {
        if self.is_cached()? {
            info!(etl_name = ETL_NAME, path = self.config.output_path.as_str(); "Removing previous output");
            fs::remove_file(self.output_path())?;
        }
        Ok(())
    }

    fn extract(&mut self) -> Result<Self::Input> {
        OsmHistoryReader::open(Path::new(&self.config.input_path))
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        self.elements_read.set(0);
        let counter = Rc::clone(&self.elements_read);
        let counted = input.inspect(move |element| {
            if element.is_ok() {
                counter.set(counter.get() + 1);
            }
        });
        Ok(Box::new(tag_history_lines(counted, self.config.tags.clone())))
    }

    fn load(&mut self, output: Self::Output) -> Result<()> {
        let partial = self.partial_path();
        match self.write_lines(&partial, output) {
            Ok(lines) => {
                fs::rename(&partial, self.output_path())
                    .map_err(|err| Error::sink(format!("Could not move {} into place: {}", partial.display(), err)))?;
                info!(
                    etl_name = ETL_NAME,
                    elements = self.elements_read(),
                    lines = lines,
                    path = self.config.output_path.as_str();
                    "Wrote tag history"
                );
                Ok(())
            },
            Err(err) => {
                if let Err(remove_err) = fs::remove_file(&partial) {
                    if remove_err.kind() != io::ErrorKind::NotFound {
                        warn!(etl_name = ETL_NAME, path = partial.display().to_string().as_str(), err = remove_err.to_string().as_str(); "Could not remove partial output");
                    }
                }
                Err(err)
            },
        }
    }
}
