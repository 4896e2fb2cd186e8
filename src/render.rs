use crate::types::{Placement, SheetSpec};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// ASCII drawing of one sheet, bottom of the sheet on the last line.
pub fn render_sheet(sheet: SheetSpec, placements: &[Placement]) -> String {
    let scale = f64::min(
        MAX_WIDTH / sheet.width as f64,
        MAX_HEIGHT / sheet.height as f64,
    );
    let grid_w = (sheet.width as f64 * scale).round() as usize;
    let grid_h = (sheet.height as f64 * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for p in placements {
        let sx = (p.x as f64 * scale).round() as usize;
        let sw = (p.actual_width as f64 * scale).round() as usize;
        let sh = (p.actual_height as f64 * scale).round() as usize;
        let top = ((p.y + p.actual_height) as f64 * scale).round() as usize;
        let sy = grid_h.saturating_sub(top);

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);

        let label: Vec<char> = p.item.id.chars().collect();
        if sw > 2 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            let start_x = cx.saturating_sub(label.len() / 2);

            for (i, &ch) in label.iter().enumerate() {
                let x = start_x + i;
                if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                    grid[cy][x] = ch;
                }
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn edge(current: char, line: char) -> char {
    if current == '+' || (current != ' ' && current != line) {
        '+'
    } else {
        line
    }
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = if rows > 0 { grid[0].len() } else { return };

    for i in x..=x + w {
        if i >= cols {
            break;
        }
        for j in [y, y + h] {
            if j < rows {
                grid[j][i] = edge(grid[j][i], '-');
            }
        }
    }

    for j in y..=y + h {
        if j >= rows {
            break;
        }
        for i in [x, x + w] {
            if i < cols {
                grid[j][i] = edge(grid[j][i], '|');
            }
        }
    }

    for cx in [x, x + w] {
        for cy in [y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}
