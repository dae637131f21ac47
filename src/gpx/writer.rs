use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::enrich::EnrichedStation;

use super::types::Track;

const CREATOR: &str = concat!("fuelstop ", env!("CARGO_PKG_VERSION"));
const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render the original track plus one fuel waypoint per enriched
/// station. Stations are expected in distance-from-start order; the
/// 1-based sequence number in the waypoint name follows that order.
/// All user- and service-supplied text goes through the XML writer and
/// is escaped there.
pub fn write_gpx(track: &Track, stations: &[EnrichedStation]) -> Result<String, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut gpx = BytesStart::new("gpx");
    gpx.push_attribute(("version", "1.1"));
    gpx.push_attribute(("creator", CREATOR));
    gpx.push_attribute(("xmlns", GPX_NAMESPACE));
    writer.write_event(Event::Start(gpx))?;

    writer.write_event(Event::Start(BytesStart::new("metadata")))?;
    write_text_element(&mut writer, "name", &track.name)?;
    writer.write_event(Event::End(BytesEnd::new("metadata")))?;

    writer.write_event(Event::Start(BytesStart::new("trk")))?;
    write_text_element(&mut writer, "name", &track.name)?;
    for segment in &track.segments {
        writer.write_event(Event::Start(BytesStart::new("trkseg")))?;
        for point in &segment.points {
            let mut trkpt = BytesStart::new("trkpt");
            trkpt.push_attribute(("lat", point.latitude.to_string().as_str()));
            trkpt.push_attribute(("lon", point.longitude.to_string().as_str()));
            writer.write_event(Event::Start(trkpt))?;
            write_text_element(&mut writer, "ele", &point.elevation.to_string())?;
            writer.write_event(Event::End(BytesEnd::new("trkpt")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("trkseg")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("trk")))?;

    for (index, enriched) in stations.iter().enumerate() {
        write_station(&mut writer, index + 1, enriched)?;
    }

    writer.write_event(Event::End(BytesEnd::new("gpx")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_station(
    writer: &mut Writer<Vec<u8>>,
    sequence: usize,
    enriched: &EnrichedStation,
) -> Result<(), WriteError> {
    let station = &enriched.station;
    let km = (enriched.distance_along_route_m / 1000.0).round() as i64;

    let mut wpt = BytesStart::new("wpt");
    wpt.push_attribute(("lat", station.location.latitude.to_string().as_str()));
    wpt.push_attribute(("lon", station.location.longitude.to_string().as_str()));
    writer.write_event(Event::Start(wpt))?;

    // Stations carry no elevation of their own; the interpolated
    // elevation of the sample that found them is close enough.
    write_text_element(writer, "ele", &enriched.sample.elevation.to_string())?;
    write_text_element(
        writer,
        "name",
        &format!("Fuel stop #{}: {} ({} km)", sequence, station.brand, km),
    )?;
    write_text_element(
        writer,
        "desc",
        &format!("{}, {:.0} m off route", station.name, station.straight_line_distance_m),
    )?;
    write_text_element(writer, "sym", "Gas Station")?;
    write_text_element(writer, "type", "Fuel Stop")?;

    writer.write_event(Event::End(BytesEnd::new("wpt")))?;
    Ok(())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), WriteError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
