use pad::PadStr;

/// Plain text table, first row is the header unless `headless`.
pub struct Table {
    ncol: usize,
    rows: Vec<Vec<String>>,
    headless: bool,
}

impl Table {
    pub fn with_capacity(size: usize, headless: bool) -> Table {
        Table {
            ncol: 0,
            rows: Vec::with_capacity(size),
            headless,
        }
    }

    pub fn set_titles(&mut self, titles: Vec<&str>) {
        self.ncol = titles.len();
        if !self.headless {
            self.rows
                .insert(0, titles.into_iter().map(String::from).collect());
        }
    }

    /// Rows shorter than the title row are padded with empty cells, extra cells are
    /// dropped.
    pub fn add(&mut self, mut row: Vec<String>) {
        row.resize(self.ncol, String::new());
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.ncol)
            .map(|col| {
                self.rows
                    .iter()
                    .map(|row| console::measure_text_width(&row[col]))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut split = String::from("+");
        for width in widths.iter() {
            split.push_str(&"-".repeat(width + 2));
            split.push('+');
        }

        let mut out = String::new();
        out.push_str(&split);
        out.push('\n');
        for (idx, row) in self.rows.iter().enumerate() {
            out.push('|');
            for (cell, width) in row.iter().zip(widths.iter()) {
                let text = cell.pad_to_width_with_alignment(*width, pad::Alignment::Left);
                out.push_str(&format!(" {text} |"));
            }
            out.push('\n');
            if idx == 0 && !self.headless {
                out.push_str(&split);
                out.push('\n');
            }
        }
        out.push_str(&split);
        out
    }

    pub fn show(&self) {
        println!("{}", self.render());
    }
}
