//! Normalizer tests: classification of bracket and paren spans, folding, and properties.

use proptest::prelude::*;

use super::spans::{self, Region};
use super::{MathPolicy, normalize, normalize_with};

#[test]
fn bracket_span_becomes_trimmed_block_math() {
    assert_eq!(normalize("[ a + b = c ]"), "$$a + b = c$$");
}

#[test]
fn escaped_bracket_span_becomes_block_math() {
    assert_eq!(normalize(r"\[ x^2 + y^2 \]"), "$$x^2 + y^2$$");
}

#[test]
fn markdown_link_is_untouched() {
    let input = "See [the docs](https://example.com/a_b?x=1) for more.";
    assert_eq!(normalize(input), input);
}

#[test]
fn image_link_is_untouched() {
    let input = "![plot](img/fig_1.png)";
    assert_eq!(normalize(input), input);
}

#[test]
fn prose_parenthetical_is_untouched() {
    let input = "(x this is just prose)";
    assert_eq!(normalize(input), input);
}

#[test]
fn math_parenthetical_becomes_inline_math() {
    assert_eq!(normalize("(E = mc^2)"), "$E = mc^2$");
}

#[test]
fn escaped_paren_with_command_becomes_inline_math() {
    assert_eq!(normalize(r"where \( \alpha_i \) is the weight"), r"where $\alpha_i$ is the weight");
}

#[test]
fn mixed_prose_math_and_link() {
    let input = "Energy is (E = mc^2), see [notes](https://x.io/?a=b_c) (page two).";
    assert_eq!(
        normalize(input),
        "Energy is $E = mc^2$, see [notes](https://x.io/?a=b_c) (page two)."
    );
}

#[test]
fn block_math_line_breaks_are_folded() {
    let out = normalize("$$\nfrac{1}{2}\n$$");
    assert_eq!(out, "$$ frac{1}{2} $$");
    assert!(!out.contains('\n'));
}

#[test]
fn multiline_bracket_span_is_folded_after_conversion() {
    assert_eq!(normalize("[ a\n+ b = c ]"), "$$a + b = c$$");
}

#[test]
fn text_around_block_math_keeps_its_line_breaks() {
    assert_eq!(
        normalize("first\n$$\na\n$$\nlast"),
        "first\n$$ a $$\nlast"
    );
}

#[test]
fn parens_inside_converted_brackets_are_not_rewrapped() {
    assert_eq!(normalize("[ f(x_1) = y ]"), "$$f(x_1) = y$$");
}

#[test]
fn canonical_math_is_not_rewrapped() {
    let input = "Inline $f(x_1)$ and block $$g(y^2)$$ stay.";
    assert_eq!(normalize(input), input);
}

#[test]
fn fenced_code_is_untouched() {
    let input = "Example:\n```python\narr[i] = f(a_b)\n```\nDone (x = 1).";
    assert_eq!(
        normalize(input),
        "Example:\n```python\narr[i] = f(a_b)\n```\nDone $x = 1$."
    );
}

#[test]
fn inline_code_is_untouched() {
    let input = "Call `map[key] = (a_b)` first.";
    assert_eq!(normalize(input), input);
}

#[test]
fn blank_checkbox_is_untouched() {
    let input = "- [ ] write tests\n- ( ) maybe";
    assert_eq!(normalize(input), input);
}

#[test]
fn unbalanced_brackets_are_left_as_is() {
    for input in ["[ a = b", "a = b ]", "(x^2", "x_1)", "[[", "))(("] {
        assert_eq!(normalize(input), input, "input: {input:?}");
    }
}

#[test]
fn empty_input_gives_empty_output() {
    assert_eq!(normalize(""), "");
}

#[test]
fn first_closing_bracket_wins() {
    assert_eq!(normalize("[a [b] c]"), "$$a [b$$ c]");
}

#[test]
fn multibyte_text_survives() {
    assert_eq!(normalize("énergie (E = mc²) ✓"), "énergie (E = mc²) ✓");
    assert_eq!(normalize("énergie (E = m_0) ✓"), "énergie $E = m_0$ ✓");
}

#[test]
fn permissive_converts_prose_parens_and_links() {
    assert_eq!(
        normalize_with("(x this is prose)", MathPolicy::Permissive),
        "$x this is prose$"
    );
    let out = normalize_with("[text](url)", MathPolicy::Permissive);
    assert!(out.starts_with("$$text$$"), "got {out:?}");
    assert_ne!(out, "[text](url)");
}

#[test]
fn permissive_still_protects_code() {
    let input = "`(a)` and ```\n[b]\n```";
    assert_eq!(normalize_with(input, MathPolicy::Permissive), input);
}

#[test]
fn policy_parses_case_insensitively() {
    assert_eq!("Strict".parse::<MathPolicy>(), Ok(MathPolicy::Strict));
    assert_eq!(" permissive ".parse::<MathPolicy>(), Ok(MathPolicy::Permissive));
    assert!("loose".parse::<MathPolicy>().is_err());
    assert_eq!(MathPolicy::default().to_string(), "strict");
}

#[test]
fn currency_before_block_math_still_folds() {
    assert_eq!(normalize("Cost $5 and $$\nx\n$$"), "Cost $5 and $$ x $$");
}

#[test]
fn currency_before_multiline_bracket_still_folds() {
    assert_eq!(normalize("Pay $5 for [x =\ny]"), "Pay $5 for $$x = y$$");
}

#[test]
fn currency_and_math_on_one_line() {
    assert_eq!(
        normalize("Pay $5 for [x = y] then $z$"),
        "Pay $5 for $$x = y$$ then $z$"
    );
    assert_eq!(
        normalize("Pay $5 for (a = b) then $z$"),
        "Pay $5 for $a = b$ then $z$"
    );
}

#[test]
fn currency_next_to_parens_and_brackets() {
    assert_eq!(
        normalize("Costs $3 (x^2) and [\na\n]"),
        "Costs $3 $x^2$ and $$a$$"
    );
    assert_eq!(normalize("$10 or (a_1) or $20"), "$10 or $a_1$ or $20");
}

#[test]
fn inline_opener_yields_to_block_math() {
    assert_eq!(normalize("$a and $$\nb\n$$"), "$a and $$ b $$");
}

/// Block math spans of `text`, as the normalizer sees them.
fn block_spans(text: &str) -> Vec<String> {
    spans::split(text)
        .into_iter()
        .filter_map(|r| match r {
            Region::BlockMath(s) => Some(s.to_string()),
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn block_math_has_no_line_breaks(s in r"[a-z0-9 =^_$\[\]()\\\n\r]{0,64}") {
        for policy in [MathPolicy::Strict, MathPolicy::Permissive] {
            let out = normalize_with(&s, policy);
            for block in block_spans(&out) {
                prop_assert!(
                    !block.contains(['\n', '\r']),
                    "{:?} has a line break in {:?}", out, block
                );
            }
        }
    }

    #[test]
    fn currency_does_not_shield_math(
        amount in "[0-9]{1,3}",
        inner in "[a-z] = [a-z]",
        tail in "[a-z]",
    ) {
        let out = normalize(&format!("Pay ${amount} for [{inner}] then ${tail}$"));
        prop_assert_eq!(out, format!("Pay ${amount} for $${inner}$$ then ${tail}$"));
    }

    #[test]
    fn never_panics_on_any_input(s in any::<String>()) {
        let _ = normalize(&s);
        let _ = normalize_with(&s, MathPolicy::Permissive);
    }

    #[test]
    fn never_panics_on_delimiter_soup(s in r"[\[\]()\\$`=^_ a\n]{0,64}") {
        let _ = normalize(&s);
        let _ = normalize_with(&s, MathPolicy::Permissive);
    }

    #[test]
    fn canonical_text_is_a_fixed_point(s in r"[a-z0-9 =^_$\\\n]{0,48}") {
        let once = normalize(&s);
        let twice = normalize(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn links_survive(
        pre in "[a-z ,.]{0,12}",
        text in "[a-z ]{1,10}",
        url in "[a-z0-9:/._=?&-]{1,20}",
        post in "[a-z ,.]{0,12}",
    ) {
        let link = format!("[{text}]({url})");
        let out = normalize(&format!("{pre}{link}{post}"));
        prop_assert!(out.contains(&link), "lost {} in {}", link, out);
    }
}
