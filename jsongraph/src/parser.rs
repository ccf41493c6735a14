//! Span-preserving JSON parser. Spans let us point diagnostics at the offending part of the
//! document, which `serde_json` alone cannot do.

use chumsky::prelude::*;

use crate::spanned::Spanned;

#[derive(Clone, Debug)]
pub enum Json {
    Null(Spanned<()>),
    Bool(Spanned<bool>),
    Str(Spanned<String>),
    Num(Spanned<f64>),
    Array(Spanned<Vec<Spanned<Json>>>),
    /// Members in source order. Duplicate names are kept so they can be reported.
    Object(Spanned<Vec<(Spanned<String>, Spanned<Json>)>>),
}

/// Taken from: <https://github.com/zesterer/chumsky/blob/main/examples/json.rs>.
pub fn parser<'a>() -> impl Parser<'a, &'a str, Spanned<Json>, extra::Err<Rich<'a, char>>> {
    recursive(|value| {
        let digits = text::digits(10).to_slice();

        let frac = just('.').then(digits);

        let exp = just('e')
            .or(just('E'))
            .then(one_of("+-").or_not())
            .then(digits)
            .labelled("exponent");

        let number = just('-')
            .or_not()
            .then(text::int(10))
            .then(frac.or_not())
            .then(exp.or_not())
            .to_slice()
            .validate(|s: &str, e, emitter| {
                let val = s.parse::<f64>().unwrap_or_else(|_| {
                    emitter.emit(Rich::custom(e.span(), "number out of range"));
                    f64::NAN
                });
                Spanned {
                    span: e.span(),
                    val,
                }
            })
            .boxed()
            .labelled("number");

        let escape = just('\\')
            .ignore_then(choice((
                just('\\'),
                just('/'),
                just('"'),
                just('b').to('\x08'),
                just('f').to('\x0C'),
                just('n').to('\n'),
                just('r').to('\r'),
                just('t').to('\t'),
            )))
            .boxed()
            .labelled("escape character");

        // One UTF-16 code unit. Four hex digits always fit in a `u32`.
        let code_unit = just("\\u")
            .ignore_then(text::digits(16).exactly(4).to_slice())
            .map(|digits: &str| u32::from_str_radix(digits, 16).unwrap_or(0xFFFD));

        let surrogate_pair = code_unit
            .clone()
            .filter(|unit| (0xD800..0xDC00).contains(unit))
            .then(
                code_unit
                    .clone()
                    .filter(|unit| (0xDC00..0xE000).contains(unit)),
            )
            .map(|(high, low)| {
                let scalar = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER)
            });

        let unicode_escape = surrogate_pair
            .or(code_unit.validate(|unit, e, emitter| {
                char::from_u32(unit).unwrap_or_else(|| {
                    emitter.emit(Rich::custom(
                        e.span(),
                        format!("unpaired surrogate \\u{unit:04x} in string"),
                    ));
                    char::REPLACEMENT_CHARACTER
                })
            }))
            .boxed()
            .labelled("unicode escape");

        // Control characters must be escaped.
        let unescaped = none_of("\\\"").filter(|c: &char| *c >= ' ');

        let string = unicode_escape
            .or(escape)
            .or(unescaped)
            .repeated()
            .collect::<String>()
            .delimited_by(just('"'), just('"'))
            .map_with(|val, e| Spanned {
                span: e.span(),
                val,
            })
            .boxed()
            .labelled("string");

        let array = value
            .clone()
            .separated_by(just(',').padded())
            .collect()
            .map_with(|val, e| Spanned {
                val,
                span: e.span(),
            })
            .padded()
            .delimited_by(just('['), just(']'))
            .boxed()
            .labelled("array");

        let member = string
            .clone()
            .then_ignore(just(':').padded())
            .then(value)
            .labelled("object member");
        let object = member
            .clone()
            .separated_by(just(',').padded())
            .collect()
            .map_with(|val, e| Spanned {
                val,
                span: e.span(),
            })
            .padded()
            .delimited_by(just('{'), just('}'))
            .boxed()
            .labelled("object");

        choice((
            just("null")
                .map_with(|_, e| Spanned {
                    span: e.span(),
                    val: Json::Null(Spanned {
                        span: e.span(),
                        val: (),
                    }),
                })
                .labelled("null"),
            just("true")
                .map_with(|_, e| Spanned {
                    span: e.span(),
                    val: Json::Bool(Spanned {
                        val: true,
                        span: e.span(),
                    }),
                })
                .labelled("true"),
            just("false")
                .map_with(|_, e| Spanned {
                    span: e.span(),
                    val: Json::Bool(Spanned {
                        val: false,
                        span: e.span(),
                    }),
                })
                .labelled("false"),
            number
                .map_with(|val, e| Spanned {
                    span: e.span(),
                    val: Json::Num(val),
                })
                .labelled("number"),
            string
                .map_with(|val, e| Spanned {
                    span: e.span(),
                    val: Json::Str(val),
                })
                .labelled("string"),
            array
                .map_with(|val, e| Spanned {
                    span: e.span(),
                    val: Json::Array(val),
                })
                .labelled("array"),
            object
                .map_with(|val, e| Spanned {
                    span: e.span(),
                    val: Json::Object(val),
                })
                .labelled("object"),
        ))
        .padded()
    })
    .then_ignore(end())
    .labelled("JSON document")
}
