pub mod jsonl_sink;
pub mod parse_osm;
pub mod tag_history;

use log::{info, error};

use crate::errors::Result;


pub trait Etl {
    type Input;
    type Output;

    fn etl_name(&self) -> &str;

    fn is_cached(&self) -> Result<bool>;
    fn clean(&self) -> Result<()>;

    fn extract(&mut self) -> Result<Self::Input>;
    fn transform(&mut self, input: Self::Input) -> Result<Self::Output>;
    fn load(&mut self, output: Self::Output) -> Result<()>;

    fn process(&mut self) -> Result<()> {
        info!(etl_name = self.etl_name(); "Starting ETL process");
        if self.is_cached()? {
            info!(etl_name = self.etl_name(); "Using cached value");
        } else {
            info!(etl_name = self.etl_name(); "Extracting");
            let input = match self.extract() {
                Ok(input) => Ok(input),
                Err(err) => {
                    error!(etl_name = self.etl_name(), kind = err.kind.name(), err = err.message.as_str(); "Extraction failed with error");
                    Err(err)
                },
            }?;

            info!(etl_name = self.etl_name(); "Transforming");
            let output = match self.transform(input) {
                Ok(output) => Ok(output),
                Err(err) => {
                    error!(etl_name = self.etl_name(), kind = err.kind.name(), err = err.message.as_str(); "Transformation failed with error");
                    Err(err)
                },
            }?;

            info!(etl_name = self.etl_name(); "Loading");
            match self.load(output) {
                Ok(_) => Ok(()),
                Err(err) => {
                    error!(etl_name = self.etl_name(), kind = err.kind.name(), err = err.message.as_str(); "Loading failed with error");
                    Err(err)
                },
            }?;
        }
        info!(etl_name = self.etl_name(); "Process finished");
        Ok(())
    }
}
