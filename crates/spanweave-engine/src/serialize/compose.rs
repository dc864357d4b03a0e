use super::{SerializeArgs, Serializer};

/// Serializers tried in order; the first `Some` wins.
pub struct ComposedSerializer<'a, R> {
    serializers: Vec<&'a dyn Serializer<R>>,
}

impl<R> std::fmt::Debug for ComposedSerializer<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedSerializer")
            .field("serializers", &self.serializers.len())
            .finish()
    }
}

/// Layers serializers, e.g. a user override above a default.
///
/// Missing (`None`) entries are skipped, so optional overrides can be passed
/// straight through.
pub fn compose_serializers<'a, R>(
    serializers: impl IntoIterator<Item = Option<&'a dyn Serializer<R>>>,
) -> ComposedSerializer<'a, R> {
    ComposedSerializer {
        serializers: serializers.into_iter().flatten().collect(),
    }
}

impl<R> Serializer<R> for ComposedSerializer<'_, R> {
    fn serialize(&self, args: &SerializeArgs<'_, R>) -> Option<R> {
        self.serializers.iter().find_map(|s| s.serialize(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, NodeKind, Span};
    use crate::serialize::serialize;
    use pretty_assertions::assert_eq;

    fn base(args: &SerializeArgs<'_, String>) -> Option<String> {
        let inner = args.children.concat();
        match args.kind {
            NodeKind::Span => Some(args.text.unwrap_or_default().to_string()),
            NodeKind::Paragraph => Some(format!("<p>{inner}</p>")),
            NodeKind::Strong => Some(format!("<strong>{inner}</strong>")),
            _ => None,
        }
    }

    fn strong_override(args: &SerializeArgs<'_, String>) -> Option<String> {
        (args.kind == NodeKind::Strong).then(|| format!("**{}**", args.children.concat()))
    }

    fn field() -> Vec<Block> {
        vec![Block::paragraph(
            "foo bar",
            vec![Span::strong(0, 3), Span::em(4, 7)],
        )]
    }

    #[test]
    fn first_serializer_with_an_opinion_wins() {
        let over: &dyn Serializer<String> = &strong_override;
        let fallback: &dyn Serializer<String> = &base;
        let composed = compose_serializers([Some(over), Some(fallback)]);
        // `em` has no handler in either, so it drops out.
        assert_eq!(serialize(&field(), &composed), vec!["<p>**foo** </p>"]);
    }

    #[test]
    fn order_decides_precedence() {
        let over: &dyn Serializer<String> = &strong_override;
        let fallback: &dyn Serializer<String> = &base;
        let composed = compose_serializers([Some(fallback), Some(over)]);
        assert_eq!(
            serialize(&field(), &composed),
            vec!["<p><strong>foo</strong> </p>"]
        );
    }

    #[test]
    fn missing_entries_are_ignored() {
        let fallback: &dyn Serializer<String> = &base;
        let composed = compose_serializers([None, Some(fallback), None]);
        assert_eq!(
            serialize(&field(), &composed),
            vec!["<p><strong>foo</strong> </p>"]
        );
    }

    #[test]
    fn empty_composition_yields_nothing() {
        let composed = compose_serializers::<String>([]);
        assert!(serialize(&field(), &composed).is_empty());
    }
}
