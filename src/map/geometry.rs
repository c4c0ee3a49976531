use crate::braille::BrailleCanvas;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Filled disc (proportional symbol body)
pub fn draw_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    // Only the part of the disc inside the canvas is visited
    let max_x = canvas.width() as i32 * 2 - 1;
    let max_y = canvas.height() as i32 * 4 - 1;
    let r2 = radius as i64 * radius as i64;

    for y in cy.saturating_sub(radius).max(0)..=cy.saturating_add(radius).min(max_y) {
        for x in cx.saturating_sub(radius).max(0)..=cx.saturating_add(radius).min(max_x) {
            let (dx, dy) = (x as i64 - cx as i64, y as i64 - cy as i64);
            if dx * dx + dy * dy <= r2 {
                canvas.set_pixel(x as usize, y as usize);
            }
        }
    }
}

/// Circle outline via the midpoint algorithm (selection ring, legend circles)
pub fn draw_ring(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    if radius <= 0 {
        canvas.set_pixel_signed(cx, cy);
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        for (px, py) in [
            (x, y), (y, x), (-y, x), (-x, y),
            (-x, -y), (-y, -x), (y, -x), (x, -y),
        ] {
            canvas.set_pixel_signed(cx.saturating_add(px), cy.saturating_add(py));
        }

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0);
        // Top dots of every cell
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_line(&mut canvas, 0, 0, 0, 7);
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }

    #[test]
    fn test_disc_contains_center_and_edge() {
        let mut canvas = BrailleCanvas::new(10, 5);
        draw_circle(&mut canvas, 10, 10, 3);
        assert!(canvas.glyph(5, 2).is_some());
        // (13, 10) lies on the edge, (14, 10) outside
        assert!(canvas.glyph(6, 2).is_some());
        assert!(canvas.glyph(8, 2).is_none());
    }

    #[test]
    fn test_disc_clipped_to_canvas() {
        let mut canvas = BrailleCanvas::new(4, 2);
        draw_circle(&mut canvas, -3, 2, 4096);
        assert_eq!(canvas.to_string(), "⣿⣿⣿⣿\n⣿⣿⣿⣿");

        let mut far = BrailleCanvas::new(4, 2);
        draw_circle(&mut far, i32::MIN, i32::MAX, 10);
        assert!(far.is_empty());
    }

    #[test]
    fn test_ring_leaves_center_empty() {
        let mut canvas = BrailleCanvas::new(20, 10);
        draw_ring(&mut canvas, 20, 20, 12);
        assert!(!canvas.is_empty());
        assert!(canvas.glyph(10, 5).is_none());
    }
}
