use super::*;

/// Dumps a `#[generator]` expansion to stdout, formatted with `rustfmt` and
/// highlighted with `bat` when those are available.
#[cfg(feature = "verbose-expansions")]
pub(in crate)
fn pretty_print_tokenstream (
    code: &'_ TokenStream2,
)
{
    fn rustfmt (input: &'_ str)
      -> Option<String>
    {
        use ::std::{io::{Read, Write}, process::{Command, Stdio}};

        let mut child =
            Command::new("rustfmt")
                .args(&["--edition", "2018", "--emit", "stdout"])
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::null())
                .spawn()
                .ok()?
        ;
        child.stdin.take()?.write_all(input.as_bytes()).ok()?;
        let mut formatted = String::new();
        child.stdout.take()?.read_to_string(&mut formatted).ok()?;
        if child.wait().ok()?.success().not() {
            return None;
        }
        Some(formatted)
    }

    let raw = code.to_string();
    let code = rustfmt(&raw).unwrap_or(raw);
    if  ::bat::PrettyPrinter::new()
            .input_from_bytes(code.as_ref())
            .language("rust")
            .true_color(false)
            .snip(true)
            .print()
            .is_err()
    {
        println!("{}", code);
    }
}
