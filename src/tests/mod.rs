pub mod util;

#[cfg(test)]
mod predicates;
#[cfg(test)]
mod front;
#[cfg(test)]
mod triangulate;
#[cfg(test)]
mod holes;
