wire_enum! {
    /// The model families the backend can fit.
    pub enum ModelKind {
        NeuralNetwork => "nn",
        RandomForest => "rf",
        SupportVectorMachine => "svm",
        KNearestNeighbors => "knn",
    }
}

wire_enum! {
    /// A hidden layer of the neural network.
    pub enum LayerType {
        Dense => "fully",
        BatchNorm => "batch",
        Dropout => "dropout",
    }
}

wire_enum! {
    pub enum Activation {
        Relu => "relu",
        Tanh => "tanh",
        Identity => "none",
    }
}

wire_enum! {
    /// Neural network optimization algorithm.
    pub enum Optimizer {
        Sgd => "sgd",
        Momentum => "momentum",
        RmsProp => "rmsprop",
        Adam => "adam",
    }
}

wire_enum! {
    /// Random forest feature limit per split.
    pub enum MaxFeatures {
        Sqrt => "sqrt",
        Log2 => "log2",
        All => "none",
    }
}

wire_enum! {
    pub enum Kernel {
        Rbf => "rbf",
        Linear => "linear",
        Poly => "poly",
        Sigmoid => "sigmoid",
    }
}

wire_enum! {
    /// kNN neighbor weighting.
    pub enum Weights {
        Uniform => "uniform",
        Distance => "distance",
    }
}

wire_enum! {
    /// kNN neighbor search algorithm.
    pub enum Algorithm {
        Auto => "auto",
        BallTree => "ball_tree",
        KdTree => "kd_tree",
        Brute => "brute",
    }
}

wire_enum! {
    /// kNN distance metric.
    pub enum Metric {
        Euclidean => "euclidean",
        Manhattan => "manhattan",
        Chebyshev => "chebyshev",
    }
}
