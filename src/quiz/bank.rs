use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use serde::de::{MapAccess, Visitor};

use crate::quiz;

// Compiled in so the bot can start without any file next to it
const EMBEDDED_QUESTIONS: &str = include_str!("../../assets/questions.json");

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("Failed to read the question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse the question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("The question bank contains no questions")]
    EmptyBank,
    #[error("Question '{id}' is defined more than once")]
    DuplicateId { id: String },
    #[error("Question '{id}' has no answer options")]
    NoOptions { id: String },
    #[error("Question '{id}' lists the option '{option}' more than once")]
    DuplicateOption { id: String, option: String },
    #[error("The correct answer of question '{id}' is not one of its options")]
    CorrectOptionMissing { id: String },
}

/// One entry of the source file, keyed by the body-part identifier.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonQuestion {
    pub question: String,
    pub context: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}
impl JsonQuestion {
    fn to_record(self, id: String) -> Result<quiz::QuestionRecord, BankError> {
        quiz::QuestionRecord::new(
            id,
            self.question,
            self.context,
            self.options,
            self.correct_answer,
        )
    }
}

/// Entries in source order. Repeated keys are kept, `HashMap` would silently
/// drop all but the last one.
struct JsonQuestions(Vec<(String, JsonQuestion)>);

impl<'de> serde::Deserialize<'de> for JsonQuestions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = JsonQuestions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of body-part identifiers to questions")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, question)) = map.next_entry::<String, JsonQuestion>()? {
                    entries.push((id, question));
                }
                Ok(JsonQuestions(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Read-only mapping from body-part identifier to its question.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: HashMap<String, quiz::QuestionRecord>,
}

impl QuestionBank {
    pub fn new(records: Vec<quiz::QuestionRecord>) -> Result<Self, BankError> {
        if records.is_empty() {
            return Err(BankError::EmptyBank);
        }

        let mut questions: HashMap<String, quiz::QuestionRecord> =
            HashMap::with_capacity(records.len());
        for record in records {
            if questions.contains_key(&record.id) {
                return Err(BankError::DuplicateId { id: record.id });
            }
            questions.insert(record.id.clone(), record);
        }

        Ok(Self { questions })
    }

    pub fn from_json_str(json: &str) -> Result<Self, BankError> {
        let data: JsonQuestions = serde_json::from_str(json)?;
        Self::from_json_questions(data)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BankError> {
        let data: JsonQuestions = serde_json::from_reader(reader)?;
        Self::from_json_questions(data)
    }

    pub fn embedded() -> Result<Self, BankError> {
        Self::from_json_str(EMBEDDED_QUESTIONS)
    }

    fn from_json_questions(data: JsonQuestions) -> Result<Self, BankError> {
        let records = data
            .0
            .into_iter()
            .map(|(id, question)| question.to_record(id))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(records)
    }

    /// A miss is not an error: the region simply has no quiz attached.
    pub fn lookup(&self, id: &str) -> Option<&quiz::QuestionRecord> {
        self.questions.get(id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids = self
            .questions
            .keys()
            .map(|id| id.as_str())
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }
}
