//! Tabular chart report
//!
//! The same facts the wheel shows, flattened into rows: where each body sits,
//! how the bodies spread over elements and modalities, and the house cusps.

use std::fmt;

use serde::Serialize;

use crate::chart::ChartData;
use crate::tables::{self, AspectType, Dignity, Element, Modality, ZodiacSign};
use crate::types::{DegreeMinute, Longitude};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyRow {
    pub name: String,
    pub glyph: String,
    pub longitude: f64,
    pub sign: ZodiacSign,
    pub degree: u32,
    pub minute: u32,
    pub element: Element,
    pub modality: Modality,
    pub dignities: Vec<Dignity>,
    pub retrograde: bool,
    pub latitude: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseRow {
    pub number: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    pub cusp: f64,
    pub sign: ZodiacSign,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectRow {
    pub key: String,
    pub angle: f64,
    /// Recorded label when it parses, otherwise classified from the angle.
    pub kind: Option<AspectType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSummary {
    pub bodies: Vec<BodyRow>,
    pub elements: Vec<(Element, usize)>,
    pub modalities: Vec<(Modality, usize)>,
    pub houses: Vec<HouseRow>,
    pub aspects: Vec<AspectRow>,
}

/// Short angle names used in position tables.
fn angle_label(number: usize) -> Option<&'static str> {
    match number {
        1 => Some("AC"),
        4 => Some("IC"),
        7 => Some("DC"),
        10 => Some("MC"),
        _ => None,
    }
}

impl ChartSummary {
    pub fn from_chart(chart: &ChartData) -> ChartSummary {
        let bodies: Vec<BodyRow> = chart
            .planet_positions
            .iter()
            .filter(|(_, pos)| pos.longitude.is_finite())
            .map(|(name, pos)| {
                let lon = pos.position();
                let sign = ZodiacSign::of(lon);
                let DegreeMinute { degrees, minutes } = DegreeMinute::of(lon.within_band());
                BodyRow {
                    name: name.to_string(),
                    glyph: tables::glyph_for(name).to_string(),
                    longitude: lon.degrees(),
                    sign,
                    degree: degrees,
                    minute: minutes,
                    element: sign.element(),
                    modality: sign.modality(),
                    dignities: tables::dignities(name, sign),
                    retrograde: chart.is_retrograde(name),
                    latitude: pos.latitude,
                    speed: chart.speed_of(name).unwrap_or(0.0),
                }
            })
            .collect();

        let elements = Element::ALL
            .iter()
            .map(|&e| (e, bodies.iter().filter(|b| b.element == e).count()))
            .collect();
        let modalities = Modality::ALL
            .iter()
            .map(|&m| (m, bodies.iter().filter(|b| b.modality == m).count()))
            .collect();

        let houses = chart
            .houses
            .iter()
            .enumerate()
            .filter(|(_, cusp)| cusp.is_finite())
            .map(|(i, &cusp)| HouseRow {
                number: i + 1,
                label: angle_label(i + 1),
                cusp: Longitude::new(cusp).degrees(),
                sign: tables::sign_of(cusp),
            })
            .collect();

        let aspects = chart
            .aspect_entries()
            .map(|entry| AspectRow {
                key: entry.key.to_string(),
                angle: entry.angle,
                kind: entry
                    .label
                    .and_then(|l| l.parse().ok())
                    .or_else(|| AspectType::classify(entry.angle)),
            })
            .collect();

        ChartSummary {
            bodies,
            elements,
            modalities,
            houses,
            aspects,
        }
    }
}

impl fmt::Display for BodyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<10} {:>2}°{:02}' {:<11}",
            self.glyph,
            self.name,
            self.degree,
            self.minute,
            self.sign.name()
        )?;
        if self.retrograde {
            write!(f, " ℞")?;
        }
        for dignity in &self.dignities {
            write!(f, " {}", dignity.name())?;
        }
        Ok(())
    }
}

impl fmt::Display for HouseRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>2} {:<2} {:>6.2}° {}",
            self.number,
            self.label.unwrap_or(""),
            self.cusp,
            self.sign.name()
        )
    }
}

impl fmt::Display for ChartSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bodies")?;
        for body in &self.bodies {
            writeln!(f, "  {}", body.to_string().trim_end())?;
        }

        let counts = |items: &mut dyn Iterator<Item = (&str, usize)>| {
            items
                .map(|(name, n)| format!("{name} {n}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(
            f,
            "Elements: {}",
            counts(&mut self.elements.iter().map(|(e, n)| (e.name(), *n)))
        )?;
        writeln!(
            f,
            "Modalities: {}",
            counts(&mut self.modalities.iter().map(|(m, n)| (m.name(), *n)))
        )?;

        if !self.houses.is_empty() {
            writeln!(f, "Houses")?;
            for house in &self.houses {
                writeln!(f, "  {}", house.to_string().trim_end())?;
            }
        }
        if !self.aspects.is_empty() {
            writeln!(f, "Aspects")?;
            for aspect in &self.aspects {
                let kind = aspect.kind.map_or("unknown", AspectType::name);
                writeln!(f, "  {} {} {:.2}°", aspect.key, kind, aspect.angle)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{BodyPosition, sample_chart};

    fn chart_with(bodies: &[(&str, f64)]) -> ChartData {
        ChartData {
            planet_positions: bodies
                .iter()
                .map(|&(name, lon)| (name, BodyPosition::at(lon)))
                .collect(),
            ..ChartData::default()
        }
    }

    #[test]
    fn body_rows_follow_document_order() {
        let summary = ChartSummary::from_chart(&sample_chart().unwrap());
        let names: Vec<_> = summary.bodies.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names[..3], ["Sun", "Moon", "Mercury"]);
        assert_eq!(summary.bodies.len(), 11);
    }

    #[test]
    fn position_within_sign() {
        let summary = ChartSummary::from_chart(&chart_with(&[("Sun", 280.37)]));
        let sun = &summary.bodies[0];
        assert_eq!(sun.sign, ZodiacSign::Capricorn);
        assert_eq!((sun.degree, sun.minute), (10, 22));
        insta::assert_snapshot!(sun.to_string().trim_end(), @"☉ Sun        10°22' Capricorn");
    }

    #[test]
    fn dignities_and_retrograde() {
        let mut chart = chart_with(&[("Mercury", 165.0), ("Mars", 10.0)]);
        chart.planet_speeds.insert("Mercury", -0.4);
        let summary = ChartSummary::from_chart(&chart);
        let mercury = &summary.bodies[0];
        assert!(mercury.retrograde);
        assert_eq!(mercury.speed, -0.4);
        assert_eq!(mercury.dignities, [Dignity::Domicile, Dignity::Exaltation]);
        insta::assert_snapshot!(
            mercury.to_string(),
            @"☿ Mercury    15°00' Virgo       ℞ domicile exaltation"
        );
        assert!(!summary.bodies[1].retrograde);
    }

    #[test]
    fn distributions_cover_every_body() {
        let summary = ChartSummary::from_chart(&chart_with(&[
            ("Sun", 5.0),
            ("Moon", 125.0),
            ("Venus", 35.0),
        ]));
        assert_eq!(
            summary.elements,
            [
                (Element::Fire, 2),
                (Element::Earth, 1),
                (Element::Air, 0),
                (Element::Water, 0)
            ]
        );
        assert_eq!(
            summary.modalities,
            [
                (Modality::Cardinal, 1),
                (Modality::Fixed, 2),
                (Modality::Mutable, 0)
            ]
        );
    }

    #[test]
    fn house_rows_label_the_angles() {
        let chart = ChartData {
            houses: (0..12).map(|i| 15.5 + 30.0 * i as f64).collect(),
            ..ChartData::default()
        };
        let summary = ChartSummary::from_chart(&chart);
        let labels: Vec<_> = summary.houses.iter().filter_map(|h| h.label).collect();
        assert_eq!(labels, ["AC", "IC", "DC", "MC"]);
        insta::assert_snapshot!(summary.houses[9].to_string(), @"10 MC 285.50° Capricorn");
    }

    #[test]
    fn aspects_fall_back_to_the_angle() {
        let mut chart = chart_with(&[("Sun", 0.0), ("Moon", 90.0), ("Mars", 180.0)]);
        chart.aspects.insert("Sun-Moon", 90.0);
        chart.aspects.insert("Sun-Mars", 178.0);
        chart.aspects_details.insert("Sun-Moon", "Square".to_string());
        let summary = ChartSummary::from_chart(&chart);
        assert_eq!(summary.aspects[0].kind, Some(AspectType::Square));
        assert_eq!(summary.aspects[1].kind, Some(AspectType::Opposition));
    }

    #[test]
    fn report_text() {
        let mut chart = chart_with(&[("Sun", 0.0), ("Moon", 90.0)]);
        chart.aspects.insert("Sun-Moon", 90.0);
        let report = ChartSummary::from_chart(&chart).to_string();
        insta::assert_snapshot!(report, @r"
        Bodies
          ☉ Sun         0°00' Aries       exaltation
          ☽ Moon        0°00' Cancer      domicile
        Elements: Fire 1, Earth 0, Air 0, Water 1
        Modalities: Cardinal 2, Fixed 0, Mutable 0
        Aspects
          Sun-Moon square 90.00°
        ");
    }
}
