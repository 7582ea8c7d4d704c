#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`Rule`](crate::Rule) inline. Each `[...]` is one alternative
/// pattern, each `{...}` one step mapping an [`Attr`](crate::Attr) variant to
/// its required value.
///
/// ```
/// use keynp::rule;
///
/// let rule = rule!("ADJ-NOUN", [
///     [{ Pos: "ADJ" }, { Pos: "NOUN" }],
///     [{ Pos: "ADJ" }, { Pos: "PROPN", IsPunct: false }],
/// ]);
/// assert_eq!(rule.patterns().len(), 2);
/// ```
#[macro_export]
macro_rules! rule {
    (
        $label:expr,
        [ $( [ $( { $( $attr:ident : $value:expr ),* $(,)? } ),+ $(,)? ] ),+ $(,)? ]
        $(,)?
    ) => {{
        $crate::Rule::try_new(
            $label,
            vec![ $( vec![ $( $crate::Step::new(vec![ $( $crate::Constraint::new($crate::Attr::$attr, $value) ),* ]) ),+ ] ),+ ],
        )
        .expect("rule! always produces at least one non-empty pattern")
    }};
}
