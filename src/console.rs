//! Line-oriented console front end.
//!
//! Commands typed on stdin become [`InputEvent`]s for the app loop; the
//! view and operator print to a writer (stdout in the binary).
//!
//! ```text
//! draw on | draw off        toggle the draw control
//! click LAT LON             left click
//! rclick LAT LON            right click (finish session / open menu)
//! esc                       cancel drawing, close menu
//! drag LAT LON LAT LON      move the edited vertex near the first point
//! hover N | leave N         pointer over / off menu item N
//! select N                  choose menu item N
//! edit ID                   edit polygon ID
//! name TEXT                 answer the next name prompt with TEXT
//! list                      print the polygons on the map
//! quit                      exit
//! ```

use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;

use gpsmanager_core::{Fix, GeoPoint, Polygon, PolygonId};
use gpsmanager_polygons::{Bounds, PolygonLayer};
use gpsmanager_ui::{ConnectionStatus, InputEvent, MapView, Menu, Operator};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

pub const HELP: &str = "commands: draw on|off, click LAT LON, rclick LAT LON, esc, \
drag LAT LON LAT LON, hover N, leave N, select N, edit ID, name TEXT, list, quit";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Input(InputEvent),
    /// Queue an answer for the next name prompt.
    Name(String),
    List,
    Help,
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match word.to_ascii_lowercase().as_str() {
        "click" => Command::Input(InputEvent::LeftClick(point(&args, "click LAT LON")?)),
        "rclick" => Command::Input(InputEvent::RightClick(point(&args, "rclick LAT LON")?)),
        "esc" => Command::Input(InputEvent::Cancel),
        "draw" => match args.as_slice() {
            ["on"] => Command::Input(InputEvent::DrawToggled(true)),
            ["off"] => Command::Input(InputEvent::DrawToggled(false)),
            _ => return Err(CommandError::Usage("draw on|off")),
        },
        "drag" => {
            const USAGE: &str = "drag LAT LON LAT LON";
            if args.len() != 4 {
                return Err(CommandError::Usage(USAGE));
            }
            Command::Input(InputEvent::DragVertex {
                from: point(&args[..2], USAGE)?,
                to: point(&args[2..], USAGE)?,
            })
        }
        "hover" | "leave" => Command::Input(InputEvent::MenuHover {
            index: single(&args, "hover N | leave N")?,
            hovered: word.eq_ignore_ascii_case("hover"),
        }),
        "select" => Command::Input(InputEvent::MenuSelect(single(&args, "select N")?)),
        "edit" => Command::Input(InputEvent::Edit(PolygonId(single(&args, "edit ID")?))),
        "name" => {
            let name = rest.trim();
            if name.is_empty() {
                return Err(CommandError::Usage("name TEXT"));
            }
            Command::Name(name.to_string())
        }
        "list" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Input(InputEvent::Close),
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn number<T: std::str::FromStr>(value: &str) -> Result<T, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidNumber(value.to_string()))
}

fn single<T: std::str::FromStr>(args: &[&str], usage: &'static str) -> Result<T, CommandError> {
    match args {
        [value] => number(value),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn point(args: &[&str], usage: &'static str) -> Result<GeoPoint, CommandError> {
    match args {
        [lat, lon] => Ok(GeoPoint::new(number(lat)?, number(lon)?)),
        _ => Err(CommandError::Usage(usage)),
    }
}

/// Names typed ahead of the prompt that will ask for them.
#[derive(Debug, Clone, Default)]
pub struct NameQueue(Arc<Mutex<VecDeque<String>>>);

impl NameQueue {
    pub fn push(&self, name: String) {
        self.0.lock().push_back(name);
    }

    pub fn pop(&self) -> Option<String> {
        self.0.lock().pop_front()
    }
}

/// Polygons as last rendered, readable from the input task.
#[derive(Debug, Clone, Default)]
pub struct PolygonSnapshot(Arc<Mutex<Vec<Polygon>>>);

impl PolygonSnapshot {
    fn replace(&self, polygons: &[Polygon]) {
        *self.0.lock() = polygons.to_vec();
    }

    pub fn polygons(&self) -> Vec<Polygon> {
        self.0.lock().clone()
    }
}

pub struct ConsoleView<W: Write> {
    out: W,
    snapshot: PolygonSnapshot,
    preview_len: usize,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W, snapshot: PolygonSnapshot) -> Self {
        Self {
            out,
            snapshot,
            preview_len: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn say(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!(error = %e, "Console write failed");
        }
    }
}

impl<W: Write> MapView for ConsoleView<W> {
    fn render(&mut self, layer: &PolygonLayer) {
        self.snapshot.replace(layer.features());
        tracing::debug!(revision = layer.revision(), features = layer.len(), "Render");
    }

    fn show_draw_preview(&mut self, vertices: &[GeoPoint]) {
        if vertices.len() != self.preview_len && !vertices.is_empty() {
            self.say(format_args!("drawing: {} vertices", vertices.len()));
        }
        self.preview_len = vertices.len();
    }

    fn set_draw_control(&mut self, active: bool) {
        self.say(format_args!("draw control {}", if active { "on" } else { "off" }));
    }

    fn show_connection_status(&mut self, status: &ConnectionStatus) {
        let (text, color) = (status.text.clone(), status.color.to_hex());
        self.say(format_args!("status: {} [{}]", text, color));
    }

    fn move_position_marker(&mut self, fix: &Fix) {
        tracing::debug!(latitude = fix.latitude, longitude = fix.longitude, "Marker moved");
    }

    fn zoom_to(&mut self, area: &Bounds) {
        let (lon, lat) = area.center();
        self.say(format_args!(
            "map centered on ({:.6}, {:.6}), {:.4}° x {:.4}°",
            lat,
            lon,
            area.height(),
            area.width()
        ));
    }
}

pub struct ConsoleOperator<W: Write> {
    out: W,
    names: NameQueue,
}

impl<W: Write> ConsoleOperator<W> {
    pub fn new(out: W, names: NameQueue) -> Self {
        Self { out, names }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn say(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!(error = %e, "Console write failed");
        }
    }
}

impl<W: Write> Operator for ConsoleOperator<W> {
    fn prompt_polygon_name(&mut self, polygon: &Polygon) -> Option<String> {
        let answer = self.names.pop();
        match &answer {
            Some(name) => self.say(format_args!("polygon named \"{}\"", name)),
            None => self.say(format_args!(
                "no name queued, keeping \"{}\"",
                polygon.display_name()
            )),
        }
        answer
    }

    fn report_error(&mut self, title: &str, message: &str) {
        self.say(format_args!("{}: {}", title, message));
    }

    fn show_menu(&mut self, menu: &Menu) {
        self.say(format_args!("{}:", menu.title));
        for (index, item) in menu.items.iter().enumerate() {
            self.say(format_args!("  [{}] {}", index, item.label));
        }
    }

    fn close_menu(&mut self) {
        tracing::trace!("Menu closed");
    }
}

/// Translate lines from `reader` into input events until EOF or `quit`.
///
/// Dropping `tx` on return ends the app loop.
pub async fn read_commands<R, W>(
    reader: R,
    mut out: W,
    tx: mpsc::Sender<InputEvent>,
    names: NameQueue,
    snapshot: PolygonSnapshot,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Input(event)) => {
                let close = event == InputEvent::Close;
                if tx.send(event).await.is_err() || close {
                    break;
                }
            }
            Ok(Command::Name(name)) => names.push(name),
            Ok(Command::List) => {
                for polygon in snapshot.polygons() {
                    let id = polygon.id.map(|id| id.to_string()).unwrap_or_default();
                    writeln!(
                        out,
                        "{:>4}  {}  ({} vertices)",
                        id,
                        polygon.display_name(),
                        polygon.vertices.len()
                    )?;
                }
            }
            Ok(Command::Help) => writeln!(out, "{}", HELP)?,
            Err(e) => writeln!(out, "{}", e)?,
        }
    }
    Ok(())
}
