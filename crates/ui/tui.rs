use std::{error::Error, io};

use crate::data::{self, ChartKind, Figure};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    crossterm::{
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    layout::{Constraint, Layout, Rect},
    style::{self, Color, Style, Stylize},
    text::Line,
    Frame, Terminal,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Cell, Paragraph, Row, Table},
};
use style::palette::tailwind;

const PALETTES: [tailwind::Palette; 4] = [
    tailwind::BLUE,
    tailwind::EMERALD,
    tailwind::INDIGO,
    tailwind::RED,
];
const INFO_TEXT: &str =
    "(Esc) quit | (c) toggle bar/pie | (t) toggle table | (→) next color | (←) previous color";

/// Chart draws the figure as bar/pie; Table lists every series as rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Chart,
    Table,
}

impl Mode {
    fn toggle(&self) -> Self {
        match self {
            Mode::Chart => Mode::Table,
            Mode::Table => Mode::Chart,
        }
    }
}

struct ChartColors {
    buffer_bg: Color,
    header_bg: Color,
    header_fg: Color,
    row_fg: Color,
    series_fg: [Color; 2],
    normal_row_color: Color,
    alt_row_color: Color,
    footer_border_color: Color,
}

impl ChartColors {
    const fn new(color: &tailwind::Palette) -> Self {
        Self {
            buffer_bg: tailwind::SLATE.c950,
            header_bg: color.c900,
            header_fg: tailwind::SLATE.c200,
            row_fg: tailwind::SLATE.c200,
            series_fg: [color.c400, color.c700],
            normal_row_color: tailwind::SLATE.c950,
            alt_row_color: tailwind::SLATE.c900,
            footer_border_color: color.c400,
        }
    }
}

struct App {
    figure: Figure,
    mode: Mode,
    colors: ChartColors,
    color_index: usize,
}

impl App {
    fn new(figure: Figure, mode: Mode) -> Self {
        Self {
            figure,
            mode,
            colors: ChartColors::new(&PALETTES[0]),
            color_index: 0,
        }
    }

    pub fn next_color(&mut self) {
        self.color_index = (self.color_index + 1) % PALETTES.len();
    }

    pub fn previous_color(&mut self) {
        let count = PALETTES.len();
        self.color_index = (self.color_index + count - 1) % count;
    }

    pub fn set_colors(&mut self) {
        self.colors = ChartColors::new(&PALETTES[self.color_index]);
    }

    pub fn toggle_kind(&mut self) {
        self.figure.kind = self.figure.kind.toggle();
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }
}

pub fn run(figure: Figure) -> Result<(), Box<dyn Error>> {
    run_with_mode(figure, Mode::Chart)
}

pub fn run_table(figure: Figure) -> Result<(), Box<dyn Error>> {
    run_with_mode(figure, Mode::Table)
}

fn run_with_mode(figure: Figure, mode: Mode) -> Result<(), Box<dyn Error>> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let app = App::new(figure, mode);
    let res = run_app(&mut terminal, app);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') => app.toggle_kind(),
                    KeyCode::Char('t') => app.toggle_mode(),
                    KeyCode::Char('l') | KeyCode::Right => app.next_color(),
                    KeyCode::Char('h') | KeyCode::Left => app.previous_color(),
                    _ => {}
                }
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rects = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(3),
    ])
    .split(f.size());

    app.set_colors();

    render_title(f, app, rects[0]);

    if app.figure.is_empty() {
        render_empty_notice(f, app, rects[1]);
    } else {
        match app.mode {
            Mode::Table => render_data_table(f, app, rects[1]),
            Mode::Chart => match app.figure.effective_kind() {
                ChartKind::Bar => render_bar_chart(f, app, rects[1]),
                ChartKind::Pie => render_share_table(f, app, rects[1]),
            },
        }
    }

    render_footer(f, app, rects[2]);
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let heading = if app.figure.series.len() > 1 {
        format!("{} ({})", app.figure.title, app.figure.series.join(" vs "))
    } else {
        app.figure.title.clone()
    };
    let title = Paragraph::new(Line::from(heading))
        .style(
            Style::new()
                .fg(app.colors.header_fg)
                .bg(app.colors.header_bg),
        )
        .centered()
        .block(Block::bordered().border_type(BorderType::Double));
    f.render_widget(title, area);
}

fn render_bar_chart(f: &mut Frame, app: &App, area: Rect) {
    // Growth rates and household sizes sit well under 1 bar-cell; scale
    // small magnitudes up and keep the real value in the bar text.
    let max = app.figure.max_value();
    let scale = if max > 0.0 && max < 100.0 { 100.0 } else { 1.0 };

    let groups: Vec<BarGroup> = app
        .figure
        .rows
        .iter()
        .map(|row| {
            let bars: Vec<Bar> = row
                .values
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    Bar::default()
                        .value((value * scale) as u64)
                        .text_value(data::format_value(*value))
                        .style(Style::new().fg(app.colors.series_fg[i % 2]))
                })
                .collect();
            BarGroup::default()
                .label(Line::from(row.label.clone()))
                .bars(&bars)
        })
        .collect();

    let mut chart = BarChart::default()
        .block(Block::bordered())
        .bar_width(9)
        .bar_gap(1)
        .group_gap(3)
        .bg(app.colors.buffer_bg);
    for group in groups {
        chart = chart.data(group);
    }
    f.render_widget(chart, area);
}

fn render_share_table(f: &mut Frame, app: &App, area: Rect) {
    let header_style = Style::default()
        .fg(app.colors.header_fg)
        .bg(app.colors.header_bg);

    let series_name = app
        .figure
        .series
        .first()
        .cloned()
        .unwrap_or_else(|| "value".to_string());
    let header = ["", series_name.as_str(), "share"]
        .into_iter()
        .map(Cell::from)
        .collect::<Row>()
        .style(header_style)
        .height(1);

    let shares = app.figure.shares();
    let rows = shares.iter().enumerate().map(|(i, (label, value, percent))| {
        let color = match i % 2 {
            0 => app.colors.normal_row_color,
            _ => app.colors.alt_row_color,
        };
        Row::new(vec![
            Cell::from(label.clone()),
            Cell::from(data::format_value(*value)),
            Cell::from(format!("{:.1}%", percent)),
        ])
        .style(Style::new().fg(app.colors.row_fg).bg(color))
        .height(1)
    });

    let widths = data::constraint_len_calculator(&shares);
    let t = Table::new(
        rows,
        [
            // + 1 is for padding.
            Constraint::Length(widths.0 + 1),
            Constraint::Min(widths.1 + 1),
            Constraint::Min(widths.2),
        ],
    )
    .header(header)
    .bg(app.colors.buffer_bg);
    f.render_widget(t, area);
}

fn render_data_table(f: &mut Frame, app: &App, area: Rect) {
    let header_style = Style::default()
        .fg(app.colors.header_fg)
        .bg(app.colors.header_bg);

    let mut header_cells = vec![Cell::from("")];
    header_cells.extend(app.figure.series.iter().map(|name| Cell::from(name.as_str())));
    let header = Row::new(header_cells).style(header_style).height(1);

    let rows = app.figure.rows.iter().enumerate().map(|(i, row)| {
        let color = match i % 2 {
            0 => app.colors.normal_row_color,
            _ => app.colors.alt_row_color,
        };
        let mut cells = vec![Cell::from(row.label.clone())];
        cells.extend(
            row.values
                .iter()
                .map(|value| Cell::from(data::format_value(*value))),
        );
        Row::new(cells)
            .style(Style::new().fg(app.colors.row_fg).bg(color))
            .height(1)
    });

    let widths: Vec<Constraint> = data::table_constraint_len_calculator(&app.figure)
        .into_iter()
        // + 1 is for padding.
        .map(|len| Constraint::Min(len + 1))
        .collect();
    let t = Table::new(rows, widths)
        .header(header)
        .bg(app.colors.buffer_bg);
    f.render_widget(t, area);
}

fn render_empty_notice(f: &mut Frame, app: &App, area: Rect) {
    let notice = Paragraph::new(Line::from("no data for this selection"))
        .style(Style::new().fg(app.colors.row_fg).bg(app.colors.buffer_bg))
        .centered()
        .block(Block::bordered());
    f.render_widget(notice, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let info_footer = Paragraph::new(Line::from(INFO_TEXT))
        .style(Style::new().fg(app.colors.row_fg).bg(app.colors.buffer_bg))
        .centered()
        .block(
            Block::bordered()
                .border_type(BorderType::Double)
                .border_style(Style::new().fg(app.colors.footer_border_color)),
        );
    f.render_widget(info_footer, area);
}

#[cfg(test)]
mod tests {
    use crate::data::{ChartKind, Figure, SliceRow};

    #[test]
    fn toggle_kind_round_trips() {
        let figure = Figure {
            title: "Rural Household Size in Lahore".to_string(),
            series: vec!["AVG HOUSEHOLD SIZE (RURAL)".to_string()],
            rows: vec![SliceRow {
                label: "Kasur".to_string(),
                values: vec![6.8],
            }],
            kind: ChartKind::Bar,
        };
        let mut app = super::App::new(figure, super::Mode::Chart);
        app.toggle_kind();
        assert_eq!(app.figure.kind, ChartKind::Pie);
        app.toggle_kind();
        assert_eq!(app.figure.kind, ChartKind::Bar);
    }

    #[test]
    fn toggle_mode_switches_chart_and_table() {
        let figure = Figure {
            title: "Urban vs Rural Population in Punjab".to_string(),
            series: vec![
                "ALL SEXES (URBAN)".to_string(),
                "ALL SEXES (RURAL)".to_string(),
            ],
            rows: vec![SliceRow {
                label: "Kasur".to_string(),
                values: vec![50.0, 50.0],
            }],
            kind: ChartKind::Bar,
        };
        let mut app = super::App::new(figure, super::Mode::Table);
        assert_eq!(app.mode, super::Mode::Table);
        app.toggle_mode();
        assert_eq!(app.mode, super::Mode::Chart);
        app.toggle_mode();
        assert_eq!(app.mode, super::Mode::Table);
    }
}
