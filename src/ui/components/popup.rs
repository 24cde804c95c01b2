use ratatui::layout::Rect;

/// Creates a centered rect with min/max constraints for width and height.
/// The actual size is clamped between min and max, then constrained to fit within area.
pub fn centered_rect_constrained(
    area: Rect,
    min_width: u16,
    max_width: u16,
    min_height: u16,
    max_height: u16,
) -> Rect {
    // Prefer max, constrain to available space, respect min
    let w = max_width
        .min(area.width.saturating_sub(4))
        .max(min_width)
        .min(area.width);
    let h = max_height
        .min(area.height.saturating_sub(4))
        .max(min_height)
        .min(area.height);

    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_is_centered_at_max_size() {
        let rect = centered_rect_constrained(Rect::new(0, 0, 100, 40), 20, 60, 5, 12);
        assert_eq!(rect, Rect::new(20, 14, 60, 12));
    }

    #[test]
    fn test_popup_never_exceeds_area() {
        let rect = centered_rect_constrained(Rect::new(0, 0, 10, 4), 20, 60, 5, 12);
        assert_eq!(rect.width, 10);
        assert_eq!(rect.height, 4);
    }
}
