use crate::generator::TimeSeries;
use std::io::{self, Write};

pub fn write_csv<W: Write>(series: &TimeSeries, mut writer: W) -> io::Result<()> {
    writeln!(writer, "t,y")?;
    for (t, y) in series.samples() {
        writeln!(writer, "{t},{y}")?;
    }
    writer.flush()
}

pub fn write_json<W: Write>(series: &TimeSeries, mut writer: W) -> serde_json::Result<()> {
    serde_json::to_writer(&mut writer, series)?;
    writer.flush().map_err(serde_json::Error::io)
}
