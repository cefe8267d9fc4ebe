use super::{QpInfo, QpProblem, QpSettings};
use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use std::io::Write;
use std::time::Duration;

impl<T> ConfigurablePrintTarget for QpInfo<T> {
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.stream.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}

macro_rules! expformat {
    ($fmt:expr,$val:expr) => {
        if $val.is_finite() {
            _exp_str_reformat(format!($fmt, $val))
        } else {
            format!($fmt, $val)
        }
    };
}

const SEPARATOR: &str =
    "------------------------------------------------------------------------------------------";

impl<T> QpInfo<T>
where
    T: FloatT,
{
    pub(crate) fn print_banner(&mut self, settings: &QpSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }
        let out = &mut self.stream;
        writeln!(out, "{}", SEPARATOR)?;
        writeln!(
            out,
            "        qrqp v{}  -  sparse active-set QP solver",
            crate::VERSION
        )?;
        writeln!(out, "{}", SEPARATOR)?;
        Ok(())
    }

    pub(crate) fn print_configuration(
        &mut self,
        settings: &QpSettings<T>,
        prob: &QpProblem<T>,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        let out = &mut self.stream;

        writeln!(out, "\nproblem:")?;
        writeln!(out, "  variables     = {}", prob.nx)?;
        writeln!(out, "  constraints   = {}", prob.na)?;
        writeln!(out, "  nnz(H)        = {}", prob.H.nnz())?;
        writeln!(out, "  nnz(A)        = {}", prob.A.nnz())?;
        writeln!(out, "  nnz(KKT)      = {}", prob.kkt.nnz())?;
        writeln!(
            out,
            "  nnz(V), nnz(R) = {}, {}",
            prob.qr.nnz_v(),
            prob.qr.nnz_r()
        )?;
        writeln!(out)?;

        self.print_settings(settings)?;
        Ok(())
    }

    fn print_settings(&mut self, settings: &QpSettings<T>) -> std::io::Result<()> {
        let out = &mut self.stream;
        let set = settings;

        writeln!(out, "settings:")?;
        writeln!(
            out,
            "  linear algebra: sparse QR, ordering: {}, precision: {} bit",
            _amd_on_off(set.qr_ordering_enable),
            _get_precision_string::<T>()
        )?;
        writeln!(
            out,
            "  max iter = {}, tol_pr = {:.1e}, tol_du = {:.1e}",
            set.max_iter, set.tol_pr, set.tol_du
        )?;
        writeln!(
            out,
            "  du_to_pr = {:.1e}, dmin = {:.1e}, sing_tol = {:.1e}, step_zero_tol = {:.1e}",
            set.du_to_pr, set.dmin, set.sing_tol, set.step_zero_tol
        )?;
        writeln!(out)?;
        Ok(())
    }

    pub(crate) fn print_status_header(&mut self, settings: &QpSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        let out = &mut self.stream;

        write!(out, "iter  ")?;
        write!(out, "sing  ")?;
        write!(out, "fk           ")?;
        write!(out, "|pr|      ")?;
        write!(out, "con    ")?;
        write!(out, "|du|      ")?;
        write!(out, "var    ")?;
        write!(out, "min_R     ")?;
        write!(out, "con    ")?;
        write!(out, "last_tau  ")?;
        write!(out, "note")?;
        writeln!(out)?;
        writeln!(out, "{}", SEPARATOR)?;
        out.flush()?;
        Ok(())
    }

    pub(crate) fn print_status(&mut self, settings: &QpSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        let out = &mut self.stream;

        write!(out, "{:>4}  ", self.iterations)?;
        write!(out, "{:>4}  ", self.sing as u8)?;
        write!(out, "{}  ", expformat!("{:+9.4e}", self.obj_val))?;
        write!(out, "{}  ", expformat!("{:8.2e}", self.pr))?;
        write!(out, "{}  ", _index_string(self.ipr))?;
        write!(out, "{}  ", expformat!("{:8.2e}", self.du))?;
        write!(out, "{}  ", _index_string(self.idu))?;
        write!(out, "{}  ", expformat!("{:8.2e}", self.mina))?;
        write!(out, "{}  ", _index_string(Some(self.imina)))?;

        if self.iterations > 0 {
            write!(out, "{}  ", expformat!("{:8.2e}", self.tau))?;
        } else {
            write!(out, "  ------  ")?;
        }

        if let Some(ref msg) = self.message {
            write!(out, "{}", msg)?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub(crate) fn print_footer(&mut self, settings: &QpSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        let out = &mut self.stream;

        writeln!(out, "{}", SEPARATOR)?;
        writeln!(out, "Terminated with status = {}", self.status)?;
        writeln!(
            out,
            "solve time = {:?}",
            Duration::from_secs_f64(self.solve_time)
        )?;
        Ok(())
    }
}

fn _amd_on_off(v: bool) -> &'static str {
    match v {
        true => "amd",
        false => "natural",
    }
}

fn _index_string(i: Option<usize>) -> String {
    match i {
        Some(i) => format!("{:>5}", i),
        None => format!("{:>5}", "-"),
    }
}

fn _get_precision_string<T: FloatT>() -> String {
    (::std::mem::size_of::<T>() * 8).to_string()
}

// convert a string in LowerExp display format into one that
// 1) always has a sign after the exponent, and
// 2) has at least two digits in the exponent.

fn _exp_str_reformat(mut thestr: String) -> String {
    let Some(eidx) = thestr.find('e') else {
        return thestr;
    };
    let has_sign = thestr[eidx + 1..].starts_with('-');
    let ndigits = thestr.len() - eidx - if has_sign { 2 } else { 1 };

    let chars = match (has_sign, ndigits < 2) {
        (false, true) => "+0",
        (false, false) => "+",
        (true, true) => "0",
        (true, false) => "",
    };

    let shift = if has_sign { 2 } else { 1 };
    thestr.insert_str(eidx + shift, chars);
    thestr
}

#[test]
fn test_exp_str_reformat() {
    assert_eq!(_exp_str_reformat("1.5e3".to_string()), "1.5e+03");
    assert_eq!(_exp_str_reformat("1.5e-3".to_string()), "1.5e-03");
    assert_eq!(_exp_str_reformat("-2.0e12".to_string()), "-2.0e+12");
    assert_eq!(_exp_str_reformat("inf".to_string()), "inf");
    assert_eq!(expformat!("{:.2e}", 0.01f64), "1.00e-02");
}
