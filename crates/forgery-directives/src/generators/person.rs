use fake::Fake;
use fake::faker::address::raw::{CityName, CountryName, StreetName, ZipCode};
use fake::faker::company::raw::CompanyName;
use fake::faker::internet::raw::{DomainSuffix, IPv4, IPv6, SafeEmail, Username};
use fake::faker::lorem::raw::Word;
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::EN;
use rand::{Rng, RngCore};
use serde_json::Value;

use forgery_core::{Error, Result, ValueKind};

use crate::catalogue::{DirectiveCatalogue, Generator, GeneratorContext};
use crate::faker_rs::{LocaleKey, NamePart, person_name};
use crate::params::{Args, ParamKind};

const AGE_RANGE: (i64, i64) = (1, 100);

static NONE: [ParamKind; 0] = [];
static LOCALE: [ParamKind; 1] = [ParamKind::Text];

pub fn register(catalogue: &mut DirectiveCatalogue) {
    let names = [
        ("name", NamePart::Full),
        ("firstName", NamePart::First),
        ("lastName", NamePart::Last),
    ];
    for (name, part) in names {
        for params in [&NONE[..], &LOCALE[..]] {
            catalogue.register(Box::new(NameGenerator {
                name,
                part,
                params,
                locale: None,
            }));
        }
    }

    let chinese = [
        ("cname", NamePart::Full),
        ("cfirstName", NamePart::First),
        ("clastName", NamePart::Last),
    ];
    for (name, part) in chinese {
        catalogue.register(Box::new(NameGenerator {
            name,
            part,
            params: &NONE,
            locale: Some(LocaleKey::ZhCn),
        }));
    }

    catalogue.register(Box::new(AgeGenerator));

    for kind in [
        FakerKind::Email,
        FakerKind::Username,
        FakerKind::Phone,
        FakerKind::Ipv4,
        FakerKind::Ipv6,
        FakerKind::Domain,
        FakerKind::City,
        FakerKind::Country,
        FakerKind::Street,
        FakerKind::Zip,
        FakerKind::Company,
    ] {
        catalogue.register(Box::new(FakerGenerator { kind }));
    }
}

struct NameGenerator {
    name: &'static str,
    part: NamePart,
    params: &'static [ParamKind],
    locale: Option<LocaleKey>,
}

impl NameGenerator {
    fn locale(&self, args: &Args, ctx: &GeneratorContext<'_>) -> Result<LocaleKey> {
        if let Some(locale) = self.locale {
            return Ok(locale);
        }
        if args.is_empty() {
            return Ok(ctx.options.locale);
        }
        let raw = args.text(0)?;
        LocaleKey::parse(raw).ok_or_else(|| {
            let supported = LocaleKey::ALL
                .iter()
                .map(|locale| locale.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            Error::invalid_argument(
                self.name,
                format!("unsupported locale '{raw}' (supported: {supported})"),
            )
        })
    }
}

impl Generator for NameGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn params(&self) -> &'static [ParamKind] {
        self.params
    }

    fn output(&self) -> ValueKind {
        ValueKind::Text
    }

    fn description(&self) -> &'static str {
        match (self.part, self.locale) {
            (NamePart::Full, Some(_)) => "zh_CN full name",
            (NamePart::First, Some(_)) => "zh_CN given name",
            (NamePart::Last, Some(_)) => "zh_CN family name",
            (NamePart::Full, None) => "full person name, optional locale",
            (NamePart::First, None) => "given name, optional locale",
            (NamePart::Last, None) => "family name, optional locale",
        }
    }

    fn validate(&self, args: &Args, ctx: &GeneratorContext<'_>) -> Result<()> {
        self.locale(args, ctx).map(|_| ())
    }

    fn generate(
        &self,
        args: &Args,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let locale = self.locale(args, ctx)?;
        Ok(Value::String(person_name(self.part, locale, rng)))
    }
}

struct AgeGenerator;

impl Generator for AgeGenerator {
    fn name(&self) -> &'static str {
        "age"
    }

    fn params(&self) -> &'static [ParamKind] {
        &NONE
    }

    fn output(&self) -> ValueKind {
        ValueKind::Int
    }

    fn description(&self) -> &'static str {
        "person age in years"
    }

    fn generate(
        &self,
        _args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let (min, max) = AGE_RANGE;
        Ok(Value::Number(rng.random_range(min..=max).into()))
    }
}

#[derive(Clone, Copy, Debug)]
enum FakerKind {
    Email,
    Username,
    Phone,
    Ipv4,
    Ipv6,
    Domain,
    City,
    Country,
    Street,
    Zip,
    Company,
}

struct FakerGenerator {
    kind: FakerKind,
}

impl Generator for FakerGenerator {
    fn name(&self) -> &'static str {
        match self.kind {
            FakerKind::Email => "email",
            FakerKind::Username => "username",
            FakerKind::Phone => "phone",
            FakerKind::Ipv4 => "ip",
            FakerKind::Ipv6 => "ipv6",
            FakerKind::Domain => "domain",
            FakerKind::City => "city",
            FakerKind::Country => "country",
            FakerKind::Street => "street",
            FakerKind::Zip => "zip",
            FakerKind::Company => "company",
        }
    }

    fn params(&self) -> &'static [ParamKind] {
        &NONE
    }

    fn output(&self) -> ValueKind {
        ValueKind::Text
    }

    fn description(&self) -> &'static str {
        match self.kind {
            FakerKind::Email => "safe example email address",
            FakerKind::Username => "login name",
            FakerKind::Phone => "phone number",
            FakerKind::Ipv4 => "IPv4 address",
            FakerKind::Ipv6 => "IPv6 address",
            FakerKind::Domain => "domain name",
            FakerKind::City => "city name",
            FakerKind::Country => "country name",
            FakerKind::Street => "street name",
            FakerKind::Zip => "postal code",
            FakerKind::Company => "company name",
        }
    }

    fn generate(
        &self,
        _args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let value: String = match self.kind {
            FakerKind::Email => SafeEmail(EN).fake_with_rng(rng),
            FakerKind::Username => Username(EN).fake_with_rng(rng),
            FakerKind::Phone => PhoneNumber(EN).fake_with_rng(rng),
            FakerKind::Ipv4 => IPv4(EN).fake_with_rng(rng),
            FakerKind::Ipv6 => IPv6(EN).fake_with_rng(rng),
            FakerKind::Domain => {
                let word: String = Word(EN).fake_with_rng(rng);
                let suffix: String = DomainSuffix(EN).fake_with_rng(rng);
                format!("{word}.{suffix}")
            }
            FakerKind::City => CityName(EN).fake_with_rng(rng),
            FakerKind::Country => CountryName(EN).fake_with_rng(rng),
            FakerKind::Street => StreetName(EN).fake_with_rng(rng),
            FakerKind::Zip => ZipCode(EN).fake_with_rng(rng),
            FakerKind::Company => CompanyName(EN).fake_with_rng(rng),
        };
        Ok(Value::String(value))
    }
}
