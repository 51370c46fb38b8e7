// Tag chips for entity lists
//
// An actor or movie row lists its feature types as chips colored after the
// parent feature. Types whose feature is no longer known get the neutral
// gray style.

use crate::color::TagStyle;
use crate::model::{Feature, FeatureType};
use crate::tui::theme::Theme;
use ratatui::style::Style;
use ratatui::text::Span;

/// Chip spans for `types`, colors resolved against the current features
pub fn tag_spans<'a>(types: &'a [FeatureType], features: &[Feature], theme: &Theme) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(types.len() * 2);
    for ty in types {
        let color = features
            .iter()
            .find(|f| f.id == ty.feature_id)
            .map(|f| f.color.as_str());
        let style = TagStyle::for_feature_color(color);

        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!(" {} ", ty.name),
            Style::default()
                .bg(theme.css_color(&style.background))
                .fg(theme.css_color(&style.text)),
        ));
    }
    spans
}
