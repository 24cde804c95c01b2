//! Persona pane: channel identity, style keywords and tone

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::status_bar::spinner_char;
use super::theme::{Theme, symbols};
use super::widgets::{input_lines, pane_block};
use crate::app::state::AppState;
use crate::persona::PersonaField;

pub fn render_persona(frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let editor = &state.persona;
    let block = pane_block(" Channel Persona ", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for field in PersonaField::ALL {
        let active = focused && editor.field == field;
        let label_style = if active {
            Theme::field_label_active()
        } else {
            Theme::field_label()
        };
        lines.push(Line::from(Span::styled(field.label(), label_style)));

        match field {
            PersonaField::Name => {
                lines.extend(input_lines(
                    &editor.profile.name,
                    "@handle, channel URL, or name",
                    active,
                ));
            }
            PersonaField::Description => {
                lines.extend(input_lines(
                    &editor.profile.description,
                    "What is the channel about?",
                    active,
                ));
            }
            PersonaField::Keywords => {
                if !editor.profile.style_keywords.is_empty() {
                    let tags: Vec<Span> = editor
                        .profile
                        .style_keywords
                        .iter()
                        .enumerate()
                        .map(|(i, k)| {
                            let style = if active && editor.keyword_cursor == Some(i) {
                                Theme::selected()
                            } else {
                                Theme::keyword_tag()
                            };
                            Span::styled(format!("#{} ", k), style)
                        })
                        .collect();
                    lines.push(Line::from(tags));
                }
                let placeholder = if active { "" } else { "add a keyword" };
                lines.extend(input_lines(&editor.keyword_input, placeholder, active));
            }
            PersonaField::Tone => {
                let tone_style = if active {
                    Theme::text_accent()
                } else {
                    Theme::text_bold()
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{} ", symbols::TONE_PREV), Theme::text_muted()),
                    Span::styled(editor.profile.tone.as_str(), tone_style),
                    Span::styled(format!(" {}", symbols::TONE_NEXT), Theme::text_muted()),
                ]));
            }
        }
        lines.push(Line::default());
    }

    if editor.analyzing {
        lines.push(Line::from(Span::styled(
            format!("{} Researching channel with Google Search...", spinner_char()),
            Theme::text_accent(),
        )));
    } else if focused && editor.field == PersonaField::Name {
        lines.push(Line::from(Span::styled(
            "Enter to analyze and fill in the persona",
            Theme::text_muted(),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .style(Theme::text())
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::types::Tone;

    #[test]
    fn test_renders_fields_tags_and_tone() {
        let mut state = AppState::default();
        state.persona.profile.name = "Gamer Central".to_string();
        state.persona.profile.style_keywords = vec!["hype".to_string(), "speedrun".to_string()];
        state.persona.profile.tone = Tone::Sarcastic;
        state.persona.set_field(PersonaField::Keywords);
        state.persona.move_keyword_cursor(false);

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|f| render_persona(f, f.area(), &state, true))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|c| c.symbol()).collect();

        assert!(screen.contains("Channel Persona"));
        assert!(screen.contains("Gamer Central"));
        assert!(screen.contains("#hype"));
        assert!(screen.contains("#speedrun"));
        assert!(screen.contains("Sarcastic"));

        // The highlighted chip is the last one
        let chip = (0..buffer.area.height)
            .flat_map(|y| (0..buffer.area.width).map(move |x| (x, y)))
            .find(|&(x, y)| {
                let end = (x + 9).min(buffer.area.width);
                let text: String = (x..end).map(|cx| buffer[(cx, y)].symbol()).collect();
                text == "#speedrun"
            })
            .unwrap();
        assert_eq!(Some(buffer[chip].bg), Theme::selected().bg);
        let hype = (chip.0.saturating_sub(6), chip.1);
        assert_eq!(buffer[hype].symbol(), "#");
        assert_ne!(Some(buffer[hype].bg), Theme::selected().bg);
    }
}
