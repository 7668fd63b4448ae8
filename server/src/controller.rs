use std::future::IntoFuture;
use std::marker::PhantomData;

// Original: https://github.com/HalsekiRaika/architectured/blob/e5caa5c7ae801d1aaac6e275b3ea0ef26d6ff26b/server/src/controller.rs
pub trait Intake<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

/// Like `Intake`, for requests that can be malformed.
pub trait TryIntake<I>: 'static + Sync + Send {
    type To;
    type Error;
    fn emit(&self, input: I) -> Result<Self::To, Self::Error>;
}

pub trait Exhaust<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

pub struct Controller<T, P> {
    transformer: T,
    presenter: P,
}

impl<T, P> Controller<T, P> {
    pub fn new(transformer: T, presenter: P) -> Self {
        Self {
            transformer,
            presenter,
        }
    }

    pub fn intake<I>(self, input: I) -> Transformed<P, <T as Intake<I>>::To>
    where
        T: Intake<I>,
    {
        Transformed {
            transformed: self.transformer.emit(input),
            presenter: self.presenter,
        }
    }

    #[allow(clippy::type_complexity)]
    pub fn try_intake<I>(
        self,
        input: I,
    ) -> Result<Transformed<P, <T as TryIntake<I>>::To>, <T as TryIntake<I>>::Error>
    where
        T: TryIntake<I>,
    {
        Ok(Transformed {
            transformed: self.transformer.emit(input)?,
            presenter: self.presenter,
        })
    }
}

pub struct Transformed<P, D> {
    transformed: D,
    presenter: P,
}

impl<P, D> Transformed<P, D> {
    pub async fn handle<F, Fut, O, E>(self, f: F) -> Result<<P as Exhaust<O>>::To, E>
    where
        P: Exhaust<O>,
        F: FnOnce(D) -> Fut,
        Fut: IntoFuture<Output = Result<O, E>>,
    {
        Ok(self.presenter.emit(f(self.transformed).await?))
    }
}

#[cfg(test)]
mod test {
    use super::{Controller, Exhaust, Intake, TryIntake};

    struct Doubler;

    impl Intake<i32> for Doubler {
        type To = i32;
        fn emit(&self, input: i32) -> Self::To {
            input * 2
        }
    }

    impl TryIntake<&'static str> for Doubler {
        type To = i32;
        type Error = std::num::ParseIntError;
        fn emit(&self, input: &'static str) -> Result<Self::To, Self::Error> {
            Ok(input.parse::<i32>()? * 2)
        }
    }

    struct Shown;

    impl Exhaust<i32> for Shown {
        type To = String;
        fn emit(&self, input: i32) -> Self::To {
            input.to_string()
        }
    }

    #[tokio::test]
    async fn flows_through_transformer_and_presenter() {
        let shown = Controller::new(Doubler, Shown)
            .intake(21)
            .handle(|n| async move { Ok::<_, ()>(n + 1) })
            .await;
        assert_eq!(shown, Ok("43".to_string()));

        assert!(Controller::new(Doubler, Shown).try_intake("x").is_err());
        let shown = Controller::new(Doubler, Shown)
            .try_intake("4")
            .unwrap()
            .handle(|n| async move { Ok::<_, ()>(n) })
            .await;
        assert_eq!(shown, Ok("8".to_string()));
    }
}
