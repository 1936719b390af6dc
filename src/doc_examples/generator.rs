fn main ()
{
    use ::thread_gen::prelude::*;

    #[generator(u8)]
    fn countdown (count: u8, last_words: &'static str)
      -> Result<(), &'static str>
    {
        let mut current = count;
        while let Some(next) = current.checked_sub(1) {
            yield_!(current);
            current = next;
        }
        Err(last_words)
    }

    let generator = countdown(3, "Boom!");
    let mut cursor = generator.iter();
    assert_eq!(cursor.next_value().unwrap(), 3);
    assert_eq!(cursor.next_value().unwrap(), 2);
    assert_eq!(cursor.next_value().unwrap(), 1);
    assert_eq!(
        cursor.next_value().unwrap_err().into_failure(),
        Some("Boom!"),
    );
    assert_eq!(cursor.state(), RunState::Failed);

    // The generator itself is untouched: iterate again from scratch.
    assert_eq!(
        generator.iter().take(2).map(Result::unwrap).collect::<Vec<_>>(),
        [3, 2],
    );
}
