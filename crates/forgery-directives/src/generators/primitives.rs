use rand::{Rng, RngCore};
use rand_regex::Regex as RandRegex;
use serde_json::{Number, Value};

use forgery_core::{Error, Result, ValueKind};

use crate::catalogue::{DirectiveCatalogue, Generator, GeneratorContext};
use crate::generators::pick;
use crate::params::{Args, ParamKind, check_count, float_bounds, int_bounds};

const DEFAULT_INT_RANGE: (i64, i64) = (-10_000, 10_000);
const DEFAULT_NATURAL_RANGE: (i64, i64) = (0, 10_000);
const DEFAULT_FLOAT_RANGE: (f64, f64) = (0.0, 10_000.0);
const MAX_SCALE: i64 = 10;
const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_PICK_ARITY: usize = 8;

static NONE: [ParamKind; 0] = [];
static ONE_INT: [ParamKind; 1] = [ParamKind::Int];
static TWO_INTS: [ParamKind; 2] = [ParamKind::Int, ParamKind::Int];
static ONE_FLOAT: [ParamKind; 1] = [ParamKind::Float];
static TWO_FLOATS: [ParamKind; 2] = [ParamKind::Float, ParamKind::Float];
static FLOAT_SCALE: [ParamKind; 3] = [ParamKind::Float, ParamKind::Float, ParamKind::Int];
static ONE_TEXT: [ParamKind; 1] = [ParamKind::Text];
static TEXT_INT: [ParamKind; 2] = [ParamKind::Text, ParamKind::Int];
static PICK_PARAMS: [ParamKind; MAX_PICK_ARITY] = [ParamKind::Text; MAX_PICK_ARITY];

pub fn register(catalogue: &mut DirectiveCatalogue) {
    catalogue.register(Box::new(BooleanGenerator { params: &NONE }));
    catalogue.register(Box::new(BooleanGenerator { params: &ONE_FLOAT }));
    for params in [&NONE[..], &ONE_INT[..], &TWO_INTS[..]] {
        catalogue.register(Box::new(IntegerGenerator {
            name: "integer",
            params,
            defaults: DEFAULT_INT_RANGE,
        }));
    }
    for params in [&NONE[..], &TWO_INTS[..]] {
        catalogue.register(Box::new(IntegerGenerator {
            name: "natural",
            params,
            defaults: DEFAULT_NATURAL_RANGE,
        }));
    }
    for params in [&NONE[..], &TWO_FLOATS[..], &FLOAT_SCALE[..]] {
        catalogue.register(Box::new(FloatGenerator { params }));
    }
    catalogue.register(Box::new(CharacterGenerator { params: &NONE }));
    catalogue.register(Box::new(CharacterGenerator { params: &ONE_TEXT }));
    for params in [&NONE[..], &ONE_INT[..], &TWO_INTS[..], &TEXT_INT[..]] {
        catalogue.register(Box::new(StringGenerator { params }));
    }
    catalogue.register(Box::new(UuidGenerator));
    catalogue.register(Box::new(RegexGenerator));
    for arity in 2..=MAX_PICK_ARITY {
        catalogue.register(Box::new(PickGenerator {
            params: &PICK_PARAMS[..arity],
        }));
    }
}

struct BooleanGenerator {
    params: &'static [ParamKind],
}

impl Generator for BooleanGenerator {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn params(&self) -> &'static [ParamKind] {
        self.params
    }

    fn output(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn description(&self) -> &'static str {
        "true with the given probability (default 0.5)"
    }

    fn validate(&self, args: &Args, _ctx: &GeneratorContext<'_>) -> Result<()> {
        probability(args).map(|_| ())
    }

    fn generate(
        &self,
        args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let p = probability(args)?;
        Ok(Value::Bool(rng.random_bool(p)))
    }
}

fn probability(args: &Args) -> Result<f64> {
    if args.is_empty() {
        return Ok(0.5);
    }
    let p = args.float(0)?;
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::invalid_argument(
            "boolean",
            format!("probability must be within [0, 1], got {p}"),
        ));
    }
    Ok(p)
}

struct IntegerGenerator {
    name: &'static str,
    params: &'static [ParamKind],
    defaults: (i64, i64),
}

impl IntegerGenerator {
    fn bounds(&self, args: &Args) -> Result<(i64, i64)> {
        let (min, max) = if args.len() == 1 {
            let max = args.int(0)?;
            if max < 0 {
                return Err(Error::invalid_argument(
                    self.name,
                    format!("max must be >= 0, got {max}"),
                ));
            }
            (0, max)
        } else {
            int_bounds(args, 0, self.defaults)?
        };
        if self.name == "natural" && min < 0 {
            return Err(Error::invalid_argument(
                self.name,
                format!("min must be >= 0, got {min}"),
            ));
        }
        Ok((min, max))
    }
}

impl Generator for IntegerGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn params(&self) -> &'static [ParamKind] {
        self.params
    }

    fn output(&self) -> ValueKind {
        ValueKind::Int
    }

    fn description(&self) -> &'static str {
        "uniform integer within inclusive bounds"
    }

    fn validate(&self, args: &Args, _ctx: &GeneratorContext<'_>) -> Result<()> {
        self.bounds(args).map(|_| ())
    }

    fn generate(
        &self,
        args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let (min, max) = self.bounds(args)?;
        Ok(Value::Number(rng.random_range(min..=max).into()))
    }
}

struct FloatGenerator {
    params: &'static [ParamKind],
}

impl FloatGenerator {
    fn scale(&self, args: &Args) -> Result<Option<i32>> {
        if args.len() < 3 {
            return Ok(None);
        }
        let scale = args.int(2)?;
        if !(0..=MAX_SCALE).contains(&scale) {
            return Err(Error::invalid_argument(
                "float",
                format!("scale must be within [0, {MAX_SCALE}], got {scale}"),
            ));
        }
        Ok(Some(scale as i32))
    }
}

impl Generator for FloatGenerator {
    fn name(&self) -> &'static str {
        "float"
    }

    fn params(&self) -> &'static [ParamKind] {
        self.params
    }

    fn output(&self) -> ValueKind {
        ValueKind::Float
    }

    fn description(&self) -> &'static str {
        "uniform float within inclusive bounds, optionally rounded to a scale"
    }

    fn validate(&self, args: &Args, _ctx: &GeneratorContext<'_>) -> Result<()> {
        float_bounds(args, 0, DEFAULT_FLOAT_RANGE)?;
        self.scale(args).map(|_| ())
    }

    fn generate(
        &self,
        args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let (min, max) = float_bounds(args, 0, DEFAULT_FLOAT_RANGE)?;
        let mut value = rng.random_range(min..=max);
        if let Some(scale) = self.scale(args)? {
            let factor = 10_f64.powi(scale);
            value = ((value * factor).round() / factor).clamp(min, max);
        }
        Number::from_f64(value)
            .map(Value::Number)
            .ok_or_else(|| Error::invalid_argument("float", "generated a non-finite value"))
    }
}

struct CharacterGenerator {
    params: &'static [ParamKind],
}

impl Generator for CharacterGenerator {
    fn name(&self) -> &'static str {
        "character"
    }

    fn params(&self) -> &'static [ParamKind] {
        self.params
    }

    fn output(&self) -> ValueKind {
        ValueKind::Text
    }

    fn description(&self) -> &'static str {
        "single character from a pool (default alphanumeric)"
    }

    fn validate(&self, args: &Args, _ctx: &GeneratorContext<'_>) -> Result<()> {
        pool(args, "character", 0).map(|_| ())
    }

    fn generate(
        &self,
        args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let chars = pool(args, "character", 0)?;
        Ok(Value::String(random_chars(&chars, 1, rng)))
    }
}

struct StringGenerator {
    params: &'static [ParamKind],
}

impl StringGenerator {
    fn shape(
        &self,
        args: &Args,
        ctx: &GeneratorContext<'_>,
    ) -> Result<(Vec<char>, usize, usize)> {
        let cap = ctx.options.max_count;
        match self.params {
            [] => {
                let max = ctx.options.string_max_len.clamp(1, cap.max(1));
                Ok((DEFAULT_CHARSET.chars().collect(), 1, max))
            }
            [ParamKind::Int] => {
                let len = check_count("string", args.count(0)?, cap)?;
                Ok((DEFAULT_CHARSET.chars().collect(), len, len))
            }
            [ParamKind::Text, ParamKind::Int] => {
                let len = check_count("string", args.count(1)?, cap)?;
                Ok((pool(args, "string", 0)?, len, len))
            }
            _ => {
                let min = args.count(0)?;
                let max = args.count(1)?;
                if min > max {
                    return Err(Error::invalid_argument(
                        "string",
                        format!("min must be <= max, got {min} > {max}"),
                    ));
                }
                check_count("string", max, cap)?;
                Ok((DEFAULT_CHARSET.chars().collect(), min, max))
            }
        }
    }
}

impl Generator for StringGenerator {
    fn name(&self) -> &'static str {
        "string"
    }

    fn params(&self) -> &'static [ParamKind] {
        self.params
    }

    fn output(&self) -> ValueKind {
        ValueKind::Text
    }

    fn description(&self) -> &'static str {
        "random string: (), (len), (min, max) or (pool, len)"
    }

    fn validate(&self, args: &Args, ctx: &GeneratorContext<'_>) -> Result<()> {
        self.shape(args, ctx).map(|_| ())
    }

    fn generate(
        &self,
        args: &Args,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let (chars, min, max) = self.shape(args, ctx)?;
        let len = if min == max {
            min
        } else {
            rng.random_range(min..=max)
        };
        Ok(Value::String(random_chars(&chars, len, rng)))
    }
}

fn pool(args: &Args, directive: &'static str, idx: usize) -> Result<Vec<char>> {
    if args.len() <= idx {
        return Ok(DEFAULT_CHARSET.chars().collect());
    }
    let chars: Vec<char> = args.text(idx)?.chars().collect();
    if chars.is_empty() {
        return Err(Error::invalid_argument(
            directive,
            "character pool must not be empty",
        ));
    }
    Ok(chars)
}

fn random_chars(chars: &[char], len: usize, rng: &mut dyn RngCore) -> String {
    let mut value = String::with_capacity(len);
    for _ in 0..len {
        let idx = rng.random_range(0..chars.len());
        value.push(chars[idx]);
    }
    value
}

struct UuidGenerator;

impl Generator for UuidGenerator {
    fn name(&self) -> &'static str {
        "uuid"
    }

    fn params(&self) -> &'static [ParamKind] {
        &NONE
    }

    fn output(&self) -> ValueKind {
        ValueKind::Uuid
    }

    fn description(&self) -> &'static str {
        "random v4 uuid"
    }

    fn generate(
        &self,
        _args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let mut bytes = [0_u8; 16];
        rng.fill_bytes(&mut bytes);
        let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
        Ok(Value::String(uuid.to_string()))
    }
}

struct RegexGenerator;

impl RegexGenerator {
    fn compile(&self, args: &Args, ctx: &GeneratorContext<'_>) -> Result<RandRegex> {
        let pattern = args.text(0)?;
        RandRegex::compile(pattern, ctx.options.max_repeat).map_err(|err| {
            Error::invalid_argument("regex", format!("invalid pattern '{pattern}': {err}"))
        })
    }
}

impl Generator for RegexGenerator {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn params(&self) -> &'static [ParamKind] {
        &ONE_TEXT
    }

    fn output(&self) -> ValueKind {
        ValueKind::Text
    }

    fn description(&self) -> &'static str {
        "string matching a regular expression"
    }

    fn validate(&self, args: &Args, ctx: &GeneratorContext<'_>) -> Result<()> {
        self.compile(args, ctx).map(|_| ())
    }

    fn generate(
        &self,
        args: &Args,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let regex = self.compile(args, ctx)?;
        let value: String = rng.sample(regex);
        Ok(Value::String(value))
    }
}

struct PickGenerator {
    params: &'static [ParamKind],
}

impl Generator for PickGenerator {
    fn name(&self) -> &'static str {
        "pick"
    }

    fn params(&self) -> &'static [ParamKind] {
        self.params
    }

    fn output(&self) -> ValueKind {
        ValueKind::Text
    }

    fn description(&self) -> &'static str {
        "one of the given values"
    }

    fn generate(
        &self,
        args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let values = args.texts();
        Ok(Value::String(pick(&values, rng).to_string()))
    }
}
