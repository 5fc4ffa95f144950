use fake::Fake;
use fake::faker::lorem::raw::{Paragraph, Sentence, Word, Words};
use fake::locales::EN;
use rand::RngCore;
use serde_json::Value;

use forgery_core::{Error, Result, ValueKind};

use crate::catalogue::{DirectiveCatalogue, Generator, GeneratorContext};
use crate::params::{Args, ParamKind, check_count};

const SENTENCE_WORDS: (usize, usize) = (4, 12);
const PARAGRAPH_SENTENCES: (usize, usize) = (3, 7);
const TITLE_WORDS: (usize, usize) = (3, 6);

static NONE: [ParamKind; 0] = [];
static COUNT: [ParamKind; 1] = [ParamKind::Int];
static RANGE: [ParamKind; 2] = [ParamKind::Int, ParamKind::Int];

pub fn register(catalogue: &mut DirectiveCatalogue) {
    catalogue.register(Box::new(LoremGenerator {
        unit: LoremUnit::Word,
        params: &NONE,
    }));
    catalogue.register(Box::new(LoremGenerator {
        unit: LoremUnit::Words,
        params: &COUNT,
    }));
    for unit in [LoremUnit::Sentence, LoremUnit::Paragraph] {
        for params in [&NONE[..], &RANGE[..]] {
            catalogue.register(Box::new(LoremGenerator { unit, params }));
        }
    }
    catalogue.register(Box::new(LoremGenerator {
        unit: LoremUnit::Title,
        params: &NONE,
    }));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoremUnit {
    Word,
    Words,
    Sentence,
    Paragraph,
    Title,
}

struct LoremGenerator {
    unit: LoremUnit,
    params: &'static [ParamKind],
}

impl LoremGenerator {
    /// Inclusive `(min, max)` count of words or sentences.
    fn counts(&self, args: &Args, ctx: &GeneratorContext<'_>) -> Result<(usize, usize)> {
        let (min, max) = match (self.unit, args.len()) {
            (LoremUnit::Words, _) => {
                let count = args.count(0)?;
                (count, count)
            }
            (_, 2) => (args.count(0)?, args.count(1)?),
            (LoremUnit::Paragraph, _) => PARAGRAPH_SENTENCES,
            (LoremUnit::Title, _) => TITLE_WORDS,
            _ => SENTENCE_WORDS,
        };
        if min > max {
            return Err(Error::invalid_argument(
                self.name(),
                format!("min must be <= max, got {min} > {max}"),
            ));
        }
        if max == 0 && self.unit != LoremUnit::Words {
            return Err(Error::invalid_argument(self.name(), "max must be > 0"));
        }
        check_count(self.name(), max, ctx.options.max_count)?;
        Ok((min, max))
    }
}

impl Generator for LoremGenerator {
    fn name(&self) -> &'static str {
        match self.unit {
            LoremUnit::Word => "word",
            LoremUnit::Words => "words",
            LoremUnit::Sentence => "sentence",
            LoremUnit::Paragraph => "paragraph",
            LoremUnit::Title => "title",
        }
    }

    fn params(&self) -> &'static [ParamKind] {
        self.params
    }

    fn output(&self) -> ValueKind {
        ValueKind::Text
    }

    fn description(&self) -> &'static str {
        match self.unit {
            LoremUnit::Word => "single lorem word",
            LoremUnit::Words => "space separated lorem words",
            LoremUnit::Sentence => "lorem sentence, optional (min, max) words",
            LoremUnit::Paragraph => "lorem paragraph, optional (min, max) sentences",
            LoremUnit::Title => "capitalized lorem title",
        }
    }

    fn validate(&self, args: &Args, ctx: &GeneratorContext<'_>) -> Result<()> {
        self.counts(args, ctx).map(|_| ())
    }

    fn generate(
        &self,
        args: &Args,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let (min, max) = self.counts(args, ctx)?;
        let range = min..max + 1;
        let value: String = match self.unit {
            LoremUnit::Word => Word(EN).fake_with_rng(rng),
            LoremUnit::Words => {
                let words: Vec<String> = Words(EN, range).fake_with_rng(rng);
                words.join(" ")
            }
            LoremUnit::Sentence => Sentence(EN, range).fake_with_rng(rng),
            LoremUnit::Paragraph => Paragraph(EN, range).fake_with_rng(rng),
            LoremUnit::Title => {
                let words: Vec<String> = Words(EN, range).fake_with_rng(rng);
                words
                    .iter()
                    .map(|word| capitalize(word))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        };
        Ok(Value::String(value))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
