//! Rule declaration macros.

/// Declares a rule that wraps content in a simple BBCode tag when either an
/// inline style property or the element name says so.
///
/// `decide` maps the style value to `Some(true)` (apply), `Some(false)`
/// (veto) or `None` (no decision, fall back to the element name). A decided
/// style is consumed.
macro_rules! style_rule (
    (
        $(#[$meta:meta])*
        $name:ident {
            id: $id:expr,
            bbcode: $bbcode:expr,
            elements: [$($element:expr),* $(,)?],
            style: $style:expr,
            decide: $decide:expr $(,)?
        }
    ) => (
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        impl $crate::rules::ProcessingRule for $name {
            fn id(&self) -> &str {
                $id
            }

            fn tags(&self) -> &[&'static str] {
                &[$bbcode]
            }

            fn to_data(
                &self,
                element: &$crate::rules::ElementView<'_>,
                content: &str,
            ) -> $crate::rules::Verdict {
                let decide: fn(&str) -> Option<bool> = $decide;
                $crate::rules::style::wrap_styled(
                    element,
                    content,
                    $bbcode,
                    &[$($element),*],
                    $style,
                    decide,
                )
            }
        }
    );
);
