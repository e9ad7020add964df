/*!
Iterator helpers.
*/

/**
Turns an iterator of `Result`s into an iterator of values that stops at the first error, stashing that error in `trap`.

This lets fallible decoders feed straight into `collect::<String>()` without an intermediate `Vec`.
*/
pub trait TrapErrExt: Sized + Iterator {
    type Trap;
    fn trap_err<'a>(self, trap: &'a mut Result<(), Self::Trap>) -> TrapErrIter<'a, Self, Self::Trap>;
}

impl<It, T, E> TrapErrExt for It where It: Iterator<Item=Result<T, E>> {
    type Trap = E;

    fn trap_err<'a>(self, trap: &'a mut Result<(), Self::Trap>) -> TrapErrIter<'a, Self, Self::Trap> {
        TrapErrIter {
            iter: Some(self),
            trap: trap,
        }
    }
}

pub struct TrapErrIter<'a, It, Trap: 'a> {
    iter: Option<It>,
    trap: &'a mut Result<(), Trap>,
}

impl<'a, It, T, E> Iterator for TrapErrIter<'a, It, E>
where
    It: Iterator<Item=Result<T, E>>,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let trapped = {
            let iter = self.iter.as_mut()?;

            match iter.next() {
                Some(Ok(e)) => return Some(e),
                Some(Err(err)) => Err(err),
                None => Ok(()),
            }
        };

        self.iter = None;
        *self.trap = trapped;
        None
    }
}
