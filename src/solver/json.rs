#![allow(non_snake_case)]
use crate::{
    algebra::*,
    solver::{QpSettings, QpSolver},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

/// Reading and writing of problem data and settings in JSON format
pub trait QpSolverJSONReadWrite: Sized {
    /// write the problem data and settings to `file`
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error>;
    /// create a new solver from a file written by `write_to_file`
    fn read_from_file(file: &mut File) -> Result<Self, io::Error>;
}

// The user-provided data only, without the workspace

#[derive(Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
struct JsonProblemData<T: FloatT> {
    pub H: CscMatrix<T>,
    pub g: Vec<T>,
    pub A: CscMatrix<T>,
    pub lbz: Vec<T>,
    pub ubz: Vec<T>,
    pub settings: QpSettings<T>,
}

impl<T> QpSolverJSONReadWrite for QpSolver<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let (lbz, ubz) = self.bounds();
        let mut json_data = JsonProblemData {
            H: self.H(),
            g: self.g().to_vec(),
            A: self.A(),
            lbz: lbz.to_vec(),
            ubz: ubz.to_vec(),
            settings: self.settings.clone(),
        };

        // json has no representation of infinity
        sanitize_bounds(&mut json_data.lbz);
        sanitize_bounds(&mut json_data.ubz);
        sanitize_settings(&mut json_data.settings);

        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let mut json_data: JsonProblemData<T> = serde_json::from_str(&buffer)?;

        desanitize_bounds(&mut json_data.lbz);
        desanitize_bounds(&mut json_data.ubz);
        desanitize_settings(&mut json_data.settings);

        let d = json_data;
        Self::new(&d.H, &d.g, &d.A, &d.lbz, &d.ubz, d.settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

fn sanitize_bounds<T: FloatT>(v: &mut [T]) {
    v.scalarop(|x| {
        if x == T::infinity() {
            T::max_value()
        } else if x == T::neg_infinity() {
            T::min_value()
        } else {
            x
        }
    });
}

fn desanitize_bounds<T: FloatT>(v: &mut [T]) {
    v.scalarop(|x| {
        if x == T::max_value() {
            T::infinity()
        } else if x == T::min_value() {
            T::neg_infinity()
        } else {
            x
        }
    });
}

fn sanitize_settings<T: FloatT>(settings: &mut QpSettings<T>) {
    if settings.inf == T::infinity() {
        settings.inf = T::max_value();
    }
}

fn desanitize_settings<T: FloatT>(settings: &mut QpSettings<T>) {
    if settings.inf == T::max_value() {
        settings.inf = T::infinity();
    }
}

#[test]
fn test_json_io() {
    use crate::solver::{QpSettingsBuilder, SolverStatus};
    use std::io::{Seek, SeekFrom};

    // minimize (x-1)^2 + (y-2)^2 subject to x + y <= 2
    let H = CscMatrix::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![2., 2.]);
    let g = [-2., -4.];
    let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.]);
    let inf = f64::INFINITY;
    let lbz = [-inf, -inf, -inf];
    let ubz = [inf, inf, 2.];

    let settings = QpSettingsBuilder::default().verbose(false).build().unwrap();

    let mut solver = QpSolver::<f64>::new(&H, &g, &A, &lbz, &ubz, settings).unwrap();
    solver.solve();
    assert_eq!(solver.solution.status, SolverStatus::Solved);

    let mut file = tempfile::tempfile().unwrap();
    solver.write_to_file(&mut file).unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let mut solver2 = QpSolver::<f64>::read_from_file(&mut file).unwrap();
    assert_eq!(solver2.bounds().0, &lbz);
    assert_eq!(solver2.settings.inf, inf);
    solver2.solve();
    assert_eq!(solver.solution.x, solver2.solution.x);
}
