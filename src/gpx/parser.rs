use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;

use super::types::{GeoPoint, Segment, Track};

const DEFAULT_TRACK_NAME: &str = "route";

/// One way of encoding points in a GPX document. Track points take
/// priority; route points are the fallback and carry no segment level.
struct Encoding {
    container: &'static [u8],
    segment: Option<&'static [u8]>,
    point: &'static [u8],
}

const TRACK_POINTS: Encoding = Encoding {
    container: b"trk",
    segment: Some(b"trkseg"),
    point: b"trkpt",
};

const ROUTE_POINTS: Encoding = Encoding {
    container: b"rte",
    segment: None,
    point: b"rtept",
};

/// Extract tracks from raw GPX text. Encodings are tried in priority
/// order and never mixed: if any track points exist, route points are
/// ignored entirely. Unusable input yields an empty vector, not an
/// error; it is the caller's job to report "no route data."
pub fn parse_gpx(xml: &str) -> Vec<Track> {
    let tracks = parse_encoding(xml, &TRACK_POINTS);
    if !tracks.is_empty() {
        return tracks;
    }
    parse_encoding(xml, &ROUTE_POINTS)
}

fn parse_encoding(xml: &str, encoding: &Encoding) -> Vec<Track> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut tracks: Vec<Track> = Vec::new();
    let mut current: Option<Track> = None;
    let mut pending: Option<GeoPoint> = None;

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(e) => e,
            Err(e) => {
                // Keep whatever was readable up to this point.
                log::debug!("stopping GPX parse on malformed XML: {}", e);
                break;
            }
        };

        match event {
            Event::Start(ref e) if e.name().as_ref() == encoding.container => {
                current = Some(Track::new(DEFAULT_TRACK_NAME));
            }
            Event::End(ref e) if e.name().as_ref() == encoding.container => {
                if let Some(track) = current.take() {
                    push_track(&mut tracks, track);
                }
            }
            Event::Start(ref e)
                if Some(e.name().as_ref()) == encoding.segment && current.is_some() =>
            {
                if let Some(track) = current.as_mut() {
                    track.segments.push(Segment::default());
                }
            }
            Event::Start(ref e) if e.name().as_ref() == encoding.point => {
                pending = point_from_attributes(e);
            }
            Event::Empty(ref e) if e.name().as_ref() == encoding.point => {
                if let Some(point) = point_from_attributes(e) {
                    append_point(&mut current, point);
                }
            }
            Event::End(ref e) if e.name().as_ref() == encoding.point => {
                if let Some(point) = pending.take() {
                    append_point(&mut current, point);
                }
            }
            Event::Start(ref e) if e.name().as_ref() == b"ele" && pending.is_some() => {
                if let Some(text) = element_text(&mut reader, e.name()) {
                    if let Ok(elevation) = text.trim().parse::<f64>() {
                        if let Some(point) = pending.as_mut() {
                            point.elevation = elevation;
                        }
                    }
                }
            }
            Event::Start(ref e)
                if e.name().as_ref() == b"name" && pending.is_none() && current.is_some() =>
            {
                if let Some(text) = element_text(&mut reader, e.name()) {
                    let name = text.trim();
                    if !name.is_empty() {
                        if let Some(track) = current.as_mut() {
                            track.name = name.to_string();
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    // A container left open by truncated input still counts.
    if let Some(track) = current.take() {
        push_track(&mut tracks, track);
    }

    tracks
}

/// Text content of the element just opened, with XML entities
/// resolved. `read_text` hands back the text as written, entity
/// references included.
fn element_text(reader: &mut Reader<&[u8]>, end: QName) -> Option<String> {
    let raw = reader.read_text(end).ok()?;
    match unescape(&raw) {
        Ok(text) => Some(text.into_owned()),
        Err(_) => Some(raw.into_owned()),
    }
}

/// Read `lat` and `lon` from a point element, in whatever order they
/// appear. A point missing either attribute is skipped.
fn point_from_attributes(element: &BytesStart) -> Option<GeoPoint> {
    let mut lat = None;
    let mut lon = None;

    for attribute in element.attributes().flatten() {
        let value = match attribute.unescape_value() {
            Ok(v) => v,
            Err(_) => continue,
        };
        match attribute.key.as_ref() {
            b"lat" => lat = value.trim().parse::<f64>().ok(),
            b"lon" => lon = value.trim().parse::<f64>().ok(),
            _ => {}
        }
    }

    Some(GeoPoint::new(lat?, lon?, 0.0))
}

fn append_point(current: &mut Option<Track>, point: GeoPoint) {
    // Points outside any container are tolerated as an anonymous track.
    let track = current.get_or_insert_with(|| Track::new(DEFAULT_TRACK_NAME));
    if track.segments.is_empty() {
        track.segments.push(Segment::default());
    }
    if let Some(segment) = track.segments.last_mut() {
        segment.points.push(point);
    }
}

fn push_track(tracks: &mut Vec<Track>, mut track: Track) {
    track.segments.retain(|s| !s.points.is_empty());
    if !track.segments.is_empty() {
        tracks.push(track);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_container_track_points_with_elevation() {
        let xml = r#"<?xml version="1.0"?>
            <gpx><trk><name>Alpenrunde</name><trkseg>
                <trkpt lat="47.0" lon="11.0"><ele>1200.5</ele></trkpt>
                <trkpt lat="47.1" lon="11.1"></trkpt>
            </trkseg></trk></gpx>"#;

        let tracks = parse_gpx(xml);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "Alpenrunde");
        let points = tracks[0].primary_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].elevation, 1200.5);
        assert_eq!(points[1].elevation, 0.0);
    }

    #[test]
    fn parses_self_closing_points_with_reversed_attributes() {
        let xml = r#"<gpx><trk><trkseg>
            <trkpt lon="8.5" lat="49.0"/>
            <trkpt lat="49.1" lon="8.6"/>
        </trkseg></trk></gpx>"#;

        let tracks = parse_gpx(xml);
        assert_eq!(tracks.len(), 1);
        let points = tracks[0].primary_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].latitude, 49.0);
        assert_eq!(points[0].longitude, 8.5);
    }

    #[test]
    fn entities_in_names_are_resolved() {
        let xml = r#"<gpx><trk><name>Rhein &amp; Mosel &lt;2024&gt;</name><trkseg>
            <trkpt lat="50.0" lon="7.0"/>
        </trkseg></trk></gpx>"#;

        let tracks = parse_gpx(xml);
        assert_eq!(tracks[0].name, "Rhein & Mosel <2024>");
    }

    #[test]
    fn falls_back_to_route_points() {
        let xml = r#"<gpx><rte><name>Pendelstrecke</name>
            <rtept lat="50.0" lon="7.0"/>
            <rtept lat="50.1" lon="7.1"/>
        </rte></gpx>"#;

        let tracks = parse_gpx(xml);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "Pendelstrecke");
        assert_eq!(tracks[0].primary_points().len(), 2);
    }

    #[test]
    fn never_merges_track_and_route_points() {
        let xml = r#"<gpx>
            <rte><rtept lat="50.0" lon="7.0"/><rtept lat="50.2" lon="7.2"/></rte>
            <trk><trkseg><trkpt lat="49.0" lon="8.5"/></trkseg></trk>
        </gpx>"#;

        let tracks = parse_gpx(xml);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].primary_points().len(), 1);
        assert_eq!(tracks[0].primary_points()[0].latitude, 49.0);
    }

    #[test]
    fn skips_points_missing_coordinates() {
        let xml = r#"<gpx><trk><trkseg>
            <trkpt lat="49.0"/>
            <trkpt lat="49.1" lon="8.6"/>
            <trkpt lon="abc" lat="49.2"/>
        </trkseg></trk></gpx>"#;

        let tracks = parse_gpx(xml);
        assert_eq!(tracks[0].primary_points().len(), 1);
        assert_eq!(tracks[0].primary_points()[0].longitude, 8.6);
    }

    #[test]
    fn empty_or_garbage_input_yields_no_tracks() {
        assert!(parse_gpx("").is_empty());
        assert!(parse_gpx("<gpx></gpx>").is_empty());
        assert!(parse_gpx("not xml at all").is_empty());
    }

    #[test]
    fn truncated_document_keeps_readable_points() {
        let xml = r#"<gpx><trk><trkseg><trkpt lat="49.0" lon="8.5"/><trkpt lat="#;
        let tracks = parse_gpx(xml);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].primary_points().len(), 1);
    }

    #[test]
    fn separate_segments_stay_separate() {
        let xml = r#"<gpx><trk>
            <trkseg><trkpt lat="49.0" lon="8.5"/></trkseg>
            <trkseg><trkpt lat="49.1" lon="8.6"/></trkseg>
        </trk></gpx>"#;

        let tracks = parse_gpx(xml);
        assert_eq!(tracks[0].segments.len(), 2);
        assert_eq!(tracks[0].point_count(), 2);
    }
}
