use std::{fs::File, io::BufReader, path::PathBuf};

use log::info;

use crate::quiz::{BankError, QuestionBank};

pub const QUESTION_BANK_PATH_VAR: &str = "QUESTION_BANK_PATH";

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// When unset, the bank compiled into the binary is used.
    pub question_bank_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let question_bank_path = std::env::var_os(QUESTION_BANK_PATH_VAR)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Self { question_bank_path }
    }

    pub fn load_bank(&self) -> Result<QuestionBank, BankError> {
        match &self.question_bank_path {
            Some(path) => {
                info!("Loading the question bank from {}", path.display());
                let file = File::open(path)?;
                QuestionBank::from_reader(BufReader::new(file))
            }
            None => {
                info!("Loading the built-in question bank");
                QuestionBank::embedded()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_the_embedded_bank() {
        let bank = Config::default().load_bank().unwrap();
        assert_eq!(bank.len(), QuestionBank::embedded().unwrap().len());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let config = Config {
            question_bank_path: Some(PathBuf::from("/definitely/not/here/questions.json")),
        };
        assert!(matches!(config.load_bank(), Err(BankError::Io(_))));
    }

    #[test]
    fn loads_the_bundled_asset_from_disk() {
        let config = Config {
            question_bank_path: Some(
                PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/questions.json"),
            ),
        };
        let bank = config.load_bank().unwrap();
        assert!(bank.lookup("Brain").is_some());
    }
}
