//! Sample tables shared by the unit tests

use polars::prelude::*;

use super::Dataset;

struct Rows {
    zeit: Vec<f64>,
    current: Vec<f64>,
    soc: Vec<f64>,
    sio: Vec<f64>,
    d: Vec<i64>,
    typ: Vec<f64>,
}

impl Rows {
    fn new() -> Self {
        Rows {
            zeit: Vec::new(),
            current: Vec::new(),
            soc: Vec::new(),
            sio: Vec::new(),
            d: Vec::new(),
            typ: Vec::new(),
        }
    }

    fn push(&mut self, zeit: f64, current: f64, soc: f64, sio: f64, d: i64, typ: f64) {
        self.zeit.push(zeit);
        self.current.push(current);
        self.soc.push(soc);
        self.sio.push(sio);
        self.d.push(d);
        self.typ.push(typ);
    }

    fn into_dataset(self) -> Dataset {
        let voltage: Vec<f64> = self
            .soc
            .iter()
            .zip(&self.zeit)
            .map(|(soc, t)| 3.0 + soc / 100.0 + t * 0.001)
            .collect();
        let frame = df!(
            "Zeit" => self.zeit,
            "Current" => self.current,
            "SOC" => self.soc,
            "SiO" => self.sio,
            "D" => self.d,
            "Typ" => self.typ,
            "Voltage" => voltage
        )
        .unwrap();
        Dataset::from_dataframe(frame, Vec::new()).unwrap()
    }
}

/// 144 rows over SOC {10,50,90}, SiO {0,15}, D {1,2,3}, both regimes
pub fn sample_dataset() -> Dataset {
    let mut rows = Rows::new();
    for soc in [10.0, 50.0, 90.0] {
        for sio in [0.0, 15.0] {
            for d in 1..=3 {
                for code in [2.0, 1.0] {
                    for t in 0..4 {
                        let t = t as f64;
                        let sign = if code == 2.0 { -1.0 } else { 1.0 };
                        let current = sign * (soc / 10.0 + t * 3.0) + d as f64 - sio / 5.0;
                        rows.push(t * 100.0, current, soc, sio, d, code);
                    }
                }
            }
        }
    }
    rows.into_dataset()
}

/// Every SOC/SiO/run/regime combination of the controls: 150 labels
pub fn full_grid_dataset() -> Dataset {
    let mut rows = Rows::new();
    for soc in [10.0, 30.0, 50.0, 70.0, 90.0] {
        for sio in [0.0, 10.0, 15.0] {
            for d in 1..=5 {
                for code in [2.0, 1.0] {
                    for t in 0..2 {
                        let sign = if code == 2.0 { -1.0 } else { 1.0 };
                        rows.push(t as f64 * 100.0, sign * soc / 10.0, soc, sio, d, code);
                    }
                }
            }
        }
    }
    rows.into_dataset()
}

/// The two-row table: one VD row at -5 A and one VH row at 7 A
pub fn two_row_dataset() -> Dataset {
    let mut rows = Rows::new();
    rows.push(0.0, -5.0, 50.0, 15.0, 1, 2.0);
    rows.push(0.0, 7.0, 50.0, 15.0, 1, 1.0);
    rows.into_dataset()
}

/// One run with a VD discharge followed by a VH discharge.
/// `vd_times`/`vh_times` give the sampled time stamps of each regime.
pub fn transition_dataset(vd_times: &[f64], vh_times: &[f64]) -> Dataset {
    let mut rows = Rows::new();
    for &t in vd_times {
        rows.push(t, -10.0 + t * 0.01, 50.0, 15.0, 1, 2.0);
    }
    for &t in vh_times {
        rows.push(t, 10.0 - t * 0.005, 50.0, 15.0, 1, 1.0);
    }
    rows.into_dataset()
}
